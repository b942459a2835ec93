use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub preference: ThemePreference,
    /// Last known OS appearance, consulted for `System`.
    pub system_dark: bool,
}

impl ThemeState {
    pub fn new(preference: ThemePreference) -> Self {
        Self {
            preference,
            system_dark: false,
        }
    }

    pub fn resolve(&self) -> Theme {
        match self.preference {
            ThemePreference::Light => Theme::Light,
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::System if self.system_dark => Theme::Dark,
            ThemePreference::System => Theme::Light,
        }
    }

    /// Switches to the explicit opposite of what is currently shown.
    pub fn toggle(&mut self) -> Theme {
        self.preference = match self.resolve() {
            Theme::Light => ThemePreference::Dark,
            Theme::Dark => ThemePreference::Light,
        };
        self.resolve()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/theme.rs"]
mod tests;

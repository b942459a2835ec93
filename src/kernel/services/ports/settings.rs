use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kernel::theme::ThemePreference;

pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 32;
pub const DEFAULT_FONT_FAMILY: &str = "'JetBrains Mono', 'Fira Code', Consolas, monospace";

/// Per-user application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: ThemePreference,
    pub font_size: u32,
    pub font_family: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemePreference::System,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl AppSettings {
    /// Builds settings from an arbitrary JSON value. Each field is checked on
    /// its own, so one bad field does not throw away the others.
    pub fn sanitize(value: &Value) -> Self {
        let defaults = Self::default();

        let theme = value
            .get("theme")
            .and_then(|v| serde_json::from_value::<ThemePreference>(v.clone()).ok())
            .unwrap_or(defaults.theme);

        let font_size = value
            .get("fontSize")
            .and_then(Value::as_f64)
            .filter(|size| size.is_finite())
            .filter(|size| (MIN_FONT_SIZE as f64..=MAX_FONT_SIZE as f64).contains(size))
            .map(|size| size.round() as u32)
            .unwrap_or(defaults.font_size);

        let font_family = value
            .get("fontFamily")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|family| !family.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.font_family);

        Self {
            theme,
            font_size,
            font_family,
        }
    }

    /// Parses a settings document; anything that is not a JSON object yields
    /// the defaults.
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value @ Value::Object(_)) => Self::sanitize(&value),
            _ => Self::default(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;

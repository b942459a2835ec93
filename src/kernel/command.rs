//! Palette commands: identifiers, labels and lookup.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleDotfiles,
    ToggleTheme,
    TogglePreview,
    OpenTerminal,
    OpenFileManager,
    CommitAllAndPush,
    OpenSettings,
    ReloadSettings,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::ToggleDotfiles,
        Command::ToggleTheme,
        Command::TogglePreview,
        Command::OpenTerminal,
        Command::OpenFileManager,
        Command::CommitAllAndPush,
        Command::OpenSettings,
        Command::ReloadSettings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::ToggleDotfiles => "view.toggleDotfiles",
            Command::ToggleTheme => "view.toggleTheme",
            Command::TogglePreview => "view.togglePreview",
            Command::OpenTerminal => "system.openTerminal",
            Command::OpenFileManager => "system.openFileManager",
            Command::CommitAllAndPush => "git.commitAllAndPush",
            Command::OpenSettings => "settings.open",
            Command::ReloadSettings => "settings.reload",
        }
    }

    pub fn from_name(name: &str) -> Option<Command> {
        Command::ALL.iter().copied().find(|cmd| cmd.name() == name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::ToggleDotfiles => "Toggle Dotfiles Visibility",
            Command::ToggleTheme => "Toggle Light/Dark Mode",
            Command::TogglePreview => "Toggle Markdown Preview",
            Command::OpenTerminal => "Open Terminal at Current Location",
            Command::OpenFileManager => "Open File Manager at Current Location",
            Command::CommitAllAndPush => "Commit All and Push",
            Command::OpenSettings => "Open Settings (JSON)",
            Command::ReloadSettings => "Reload Settings",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Command::ToggleDotfiles | Command::ToggleTheme | Command::TogglePreview => "View",
            Command::OpenTerminal | Command::OpenFileManager => "System",
            Command::CommitAllAndPush => "Git",
            Command::OpenSettings | Command::ReloadSettings => "Settings",
        }
    }

    /// Commands acting on the workspace are unavailable without one.
    pub fn requires_workspace(&self) -> bool {
        matches!(
            self,
            Command::ToggleDotfiles
                | Command::TogglePreview
                | Command::OpenTerminal
                | Command::OpenFileManager
                | Command::CommitAllAndPush
        )
    }

    pub fn is_enabled(&self, has_workspace: bool) -> bool {
        has_workspace || !self.requires_workspace()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteItem {
    pub command: Command,
    pub category: &'static str,
    pub label: &'static str,
}

/// Enabled commands whose "category label" contains `query`, ignoring case.
pub fn filter(query: &str, has_workspace: bool) -> Vec<PaletteItem> {
    let query = query.trim().to_lowercase();
    Command::ALL
        .iter()
        .filter(|cmd| cmd.is_enabled(has_workspace))
        .filter(|cmd| {
            query.is_empty()
                || format!("{} {}", cmd.category(), cmd.label())
                    .to_lowercase()
                    .contains(&query)
        })
        .map(|cmd| PaletteItem {
            command: *cmd,
            category: cmd.category(),
            label: cmd.label(),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/command.rs"]
mod tests;

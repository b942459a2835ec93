//! Command palette executors.
//!
//! `CommandHost` owns the OS ports and the per-user state the commands touch
//! (theme and settings). Every outcome is reported through the workspace
//! notification queue.

mod git;
mod settings;
mod system;
mod view;

use crate::kernel::command::Command;
use crate::kernel::services::adapters::settings::load_settings_from;
use crate::kernel::services::ports::settings::AppSettings;
use crate::kernel::services::ports::shell::{GitPort, InputPrompt, ShellPort};
use crate::kernel::theme::{Theme, ThemeState};
use crate::kernel::workspace::Workspace;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use git::{COMMIT_PROMPT_PLACEHOLDER, COMMIT_PROMPT_TITLE};

pub struct CommandHost {
    shell: Arc<dyn ShellPort>,
    git: Arc<dyn GitPort>,
    prompt: Arc<dyn InputPrompt>,
    theme: ThemeState,
    settings: AppSettings,
    settings_path: Option<PathBuf>,
}

impl std::fmt::Debug for CommandHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHost")
            .field("theme", &self.theme)
            .field("settings", &self.settings)
            .field("settings_path", &self.settings_path)
            .finish()
    }
}

impl CommandHost {
    pub fn new(
        shell: Arc<dyn ShellPort>,
        git: Arc<dyn GitPort>,
        prompt: Arc<dyn InputPrompt>,
    ) -> Self {
        let settings = AppSettings::default();
        Self {
            shell,
            git,
            prompt,
            theme: ThemeState::new(settings.theme),
            settings,
            settings_path: None,
        }
    }

    /// Uses `path` as the settings file and loads it.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.apply_settings(load_settings_from(&path));
        self.settings_path = Some(path);
        self
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    pub fn theme(&self) -> Theme {
        self.theme.resolve()
    }

    pub fn theme_state(&self) -> &ThemeState {
        &self.theme
    }

    /// Records the OS appearance used by the `System` preference.
    pub fn set_system_dark(&mut self, dark: bool) {
        self.theme.system_dark = dark;
    }

    fn apply_settings(&mut self, settings: AppSettings) {
        self.theme.preference = settings.theme;
        self.settings = settings;
    }

    /// Runs `command` against `workspace`. Returns `false` when the command is
    /// disabled in the current state.
    pub async fn execute(&mut self, command: Command, workspace: &mut Workspace) -> bool {
        if !command.is_enabled(workspace.root().is_some()) {
            tracing::debug!(command = command.name(), "command disabled");
            return false;
        }
        tracing::debug!(command = command.name(), "executing command");

        match command {
            Command::ToggleDotfiles => view::toggle_dotfiles(workspace).await,
            Command::ToggleTheme => view::toggle_theme(self, workspace),
            Command::TogglePreview => view::toggle_preview(workspace).await,
            Command::OpenTerminal => system::open_terminal(self, workspace).await,
            Command::OpenFileManager => system::open_file_manager(self, workspace).await,
            Command::CommitAllAndPush => git::commit_all_and_push(self, workspace).await,
            Command::OpenSettings => settings::open_settings(self, workspace).await,
            Command::ReloadSettings => settings::reload_settings(self, workspace),
        }
        true
    }

    /// Looks a command up by its palette id and runs it.
    pub async fn execute_named(&mut self, name: &str, workspace: &mut Workspace) -> bool {
        match Command::from_name(name) {
            Some(command) => self.execute(command, workspace).await,
            None => {
                tracing::warn!(command = name, "unknown command");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/commands.rs"]
mod tests;

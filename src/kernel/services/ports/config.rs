use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: &str = "1.0.0";
pub const DEFAULT_SIDEBAR_WIDTH: u32 = 250;
pub const MIN_SIDEBAR_WIDTH: u32 = 150;
pub const MAX_SIDEBAR_WIDTH: u32 = 500;

/// Per-root settings persisted in the workspace config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceConfig {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_file: Option<PathBuf>,
    /// Insertion ordered; membership is all that matters for flattening.
    pub expanded_folders: Vec<PathBuf>,
    pub sidebar_width: u32,
    pub preview_enabled: bool,
    pub show_dotfiles: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            last_opened_file: None,
            expanded_folders: Vec::new(),
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            preview_enabled: false,
            show_dotfiles: false,
        }
    }
}

impl WorkspaceConfig {
    /// Parses a config document. Unknown or missing fields fall back to their
    /// defaults; a document that is not valid JSON yields `None`.
    pub fn from_json(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded_folders.iter().any(|p| p == path)
    }

    /// Returns `true` when `path` is expanded after the call.
    pub fn toggle_expanded(&mut self, path: &Path) -> bool {
        if let Some(index) = self.expanded_folders.iter().position(|p| p == path) {
            self.expanded_folders.remove(index);
            false
        } else {
            self.expanded_folders.push(path.to_path_buf());
            true
        }
    }

    /// Returns `true` if the folder was not expanded before.
    pub fn expand(&mut self, path: &Path) -> bool {
        if self.is_expanded(path) {
            return false;
        }
        self.expanded_folders.push(path.to_path_buf());
        true
    }

    pub fn collapse(&mut self, path: &Path) -> bool {
        let before = self.expanded_folders.len();
        self.expanded_folders.retain(|p| p != path);
        self.expanded_folders.len() != before
    }

    pub fn set_sidebar_width(&mut self, width: u32) -> u32 {
        self.sidebar_width = width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH);
        self.sidebar_width
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;

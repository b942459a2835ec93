//! Remembers the last opened workspace root between runs.

use super::dirs::get_app_data_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_workspace: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_app_dir() -> Option<Self> {
        get_app_data_dir().map(|dir| Self::new(dir.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Session {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    pub fn remember(&self, root: &Path) -> std::io::Result<()> {
        self.store(&Session {
            last_workspace: Some(root.to_path_buf()),
        })
    }

    pub fn clear(&self) -> std::io::Result<()> {
        self.store(&Session::default())
    }

    /// The last workspace if it is still a directory; a stale entry is
    /// cleared.
    pub fn restore(&self) -> Option<PathBuf> {
        let root = self.load().last_workspace?;
        if root.is_dir() {
            return Some(root);
        }
        tracing::info!(root = %root.display(), "last workspace is gone, forgetting it");
        if let Err(err) = self.clear() {
            tracing::warn!(error = %err, "failed to clear session");
        }
        None
    }

    fn store(&self, session: &Session) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(&self.path, content)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/session.rs"]
mod tests;

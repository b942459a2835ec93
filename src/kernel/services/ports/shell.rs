//! Contracts for the OS integrations reachable from the command palette.

use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {code:?}: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("not supported on this platform")]
    Unsupported,
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

#[async_trait]
pub trait ShellPort: Send + Sync {
    /// Opens a terminal window whose working directory is `dir`.
    async fn open_terminal(&self, dir: &Path) -> CommandResult<()>;

    /// Reveals `path` in the platform file manager.
    async fn open_file_manager(&self, path: &Path) -> CommandResult<()>;
}

#[async_trait]
pub trait GitPort: Send + Sync {
    /// `git status --porcelain`; empty output means a clean tree.
    async fn status_porcelain(&self, root: &Path) -> CommandResult<String>;

    async fn add_all(&self, root: &Path) -> CommandResult<()>;

    async fn commit(&self, root: &Path, message: &str) -> CommandResult<()>;

    async fn push(&self, root: &Path) -> CommandResult<()>;
}

/// Asks the user for one line of text. `None` means the prompt was cancelled.
#[async_trait]
pub trait InputPrompt: Send + Sync {
    async fn request_line(&self, title: &str, placeholder: &str) -> Option<String>;
}

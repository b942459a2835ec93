use crate::kernel::drag::DropRejection;
use crate::kernel::editing::NameError;
use crate::kernel::services::ports::file::FsError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Validation(#[from] NameError),
    #[error("An item named \"{}\" already exists", display_file_name(.0))]
    Conflict(PathBuf),
    #[error(transparent)]
    InvalidMove(#[from] DropRejection),
    #[error("Failed to {op} {}: {source}", .path.display())]
    Adapter {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: FsError,
    },
    #[error("no workspace is open")]
    NoWorkspace,
    #[error("another edit is already in progress")]
    EditingInProgress,
    #[error("no edit in progress")]
    NotEditing,
}

fn display_file_name(path: &std::path::Path) -> String {
    crate::models::display_name(path)
}

impl WorkspaceError {
    pub fn adapter(op: &'static str, path: impl Into<PathBuf>, source: FsError) -> Self {
        WorkspaceError::Adapter {
            op,
            path: path.into(),
            source,
        }
    }

    /// Errors that are reported through a notification rather than inline.
    pub fn is_reportable(&self) -> bool {
        matches!(
            self,
            WorkspaceError::Conflict(_) | WorkspaceError::Adapter { .. }
        )
    }
}

pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

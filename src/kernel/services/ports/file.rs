//! File-system adapter contract.
//!
//! The workspace core never touches the disk directly: every listing, read,
//! write and structural mutation goes through an [`FsAdapter`]. The adapter is
//! the source of truth; the in-memory tree only mirrors what it reports.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the per-workspace config file stored inside the root.
pub const WORKSPACE_CONFIG_FILE: &str = ".mdeditor.json";

/// Extension that marks a file as a workspace document.
pub const MARKDOWN_EXTENSION: &str = ".md";

pub type Result<T> = std::result::Result<T, FsError>;

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl FsError {
    /// Maps an `io::Error` onto the variant that names the offending path.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntryInfo {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub show_dotfiles: bool,
}

#[async_trait]
pub trait FsAdapter: Send + Sync {
    /// Lists `path`, already filtered and sorted by [`filter_and_sort`].
    async fn list_directory(&self, path: &Path, options: ListOptions)
        -> Result<Vec<DirEntryInfo>>;

    async fn read_file(&self, path: &Path) -> Result<String>;

    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Creates `path` and any missing ancestors.
    async fn create_directory(&self, path: &Path) -> Result<()>;

    /// Creates an empty file.
    async fn create_file(&self, path: &Path) -> Result<()>;

    async fn delete_recursive(&self, path: &Path) -> Result<()>;

    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    async fn exists(&self, path: &Path) -> Result<bool>;
}

/// Entries that never show up in a listing, whatever the dotfile setting.
pub fn is_reserved(name: &str) -> bool {
    matches!(name, ".git" | WORKSPACE_CONFIG_FILE)
}

fn is_visible(entry: &DirEntryInfo, options: ListOptions) -> bool {
    if is_reserved(&entry.name) {
        return false;
    }
    let is_dotfile = entry.name.starts_with('.');
    if is_dotfile && !options.show_dotfiles {
        return false;
    }
    entry.is_dir || is_dotfile || entry.name.ends_with(MARKDOWN_EXTENSION)
}

/// Listing policy shared by every adapter: directories, markdown files and
/// (on request) dotfiles; directories first, then case-sensitive by name.
pub fn filter_and_sort(entries: Vec<DirEntryInfo>, options: ListOptions) -> Vec<DirEntryInfo> {
    let mut entries: Vec<_> = entries
        .into_iter()
        .filter(|entry| is_visible(entry, options))
        .collect();

    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });

    entries
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/file.rs"]
mod tests;

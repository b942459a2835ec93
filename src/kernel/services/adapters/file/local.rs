//! Local file system adapter on top of `tokio::fs`.

use crate::kernel::services::ports::file::{
    filter_and_sort, DirEntryInfo, FsAdapter, FsError, ListOptions, Result,
};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsAdapter for LocalFs {
    async fn list_directory(&self, path: &Path, options: ListOptions) -> Result<Vec<DirEntryInfo>> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| FsError::from_io(path, e))?;
        if !metadata.is_dir() {
            return Err(FsError::NotADirectory(path.to_path_buf()));
        }

        let mut reader = fs::read_dir(path)
            .await
            .map_err(|e| FsError::from_io(path, e))?;
        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| FsError::from_io(path, e))?
        {
            // Follows symlinks so a linked folder lists as a folder.
            let is_dir = match fs::metadata(entry.path()).await {
                Ok(meta) => meta.is_dir(),
                Err(_) => continue,
            };
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir,
            });
        }

        Ok(filter_and_sort(entries, options))
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }

    async fn create_file(&self, path: &Path) -> Result<()> {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map(|_| ())
            .map_err(|e| FsError::from_io(path, e))
    }

    async fn delete_recursive(&self, path: &Path) -> Result<()> {
        let metadata = fs::symlink_metadata(path)
            .await
            .map_err(|e| FsError::from_io(path, e))?;
        let result = if metadata.is_dir() {
            fs::remove_dir_all(path).await
        } else {
            fs::remove_file(path).await
        };
        result.map_err(|e| FsError::from_io(path, e))
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if fs::try_exists(to)
            .await
            .map_err(|e| FsError::from_io(to, e))?
        {
            return Err(FsError::AlreadyExists(to.to_path_buf()));
        }
        fs::rename(from, to)
            .await
            .map_err(|e| FsError::from_io(from, e))
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        fs::try_exists(path)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/local.rs"]
mod tests;

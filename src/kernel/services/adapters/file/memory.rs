//! In-process file system.
//!
//! Backs headless embeddings and the test-suite. Every operation is recorded
//! and any of them can be made to fail for a given path.

use crate::kernel::services::ports::file::{
    filter_and_sort, DirEntryInfo, FsAdapter, FsError, ListOptions, Result,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsOp {
    List,
    Read,
    Write,
    CreateDirectory,
    CreateFile,
    Delete,
    Rename,
    Exists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsCall {
    pub op: FsOp,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
enum Entry {
    Dir,
    File(String),
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<PathBuf, Entry>,
    failures: Vec<(FsOp, Option<PathBuf>)>,
    calls: Vec<FsCall>,
}

impl Inner {
    fn record(&mut self, op: FsOp, path: &Path) -> Result<()> {
        self.calls.push(FsCall {
            op,
            path: path.to_path_buf(),
        });
        let injected = self.failures.iter().any(|(fail_op, fail_path)| {
            *fail_op == op && fail_path.as_deref().map_or(true, |p| p == path)
        });
        if injected {
            return Err(FsError::PermissionDenied(path.to_path_buf()));
        }
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries.get(path), Some(Entry::Dir))
    }

    fn require_parent_dir(&self, path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if self.is_dir(parent) => Ok(()),
            Some(parent) if self.entries.contains_key(parent) => {
                Err(FsError::NotADirectory(parent.to_path_buf()))
            }
            Some(parent) => Err(FsError::NotFound(parent.to_path_buf())),
            None => Err(FsError::NotFound(path.to_path_buf())),
        }
    }

    /// `path` itself followed by all of its descendants.
    fn subtree_keys(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .range(path.to_path_buf()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(path))
            .cloned()
            .collect()
    }

    fn insert_dir_all(&mut self, path: &Path) -> Result<()> {
        let mut ancestors: Vec<&Path> = path.ancestors().collect();
        ancestors.reverse();
        for dir in ancestors {
            if dir.as_os_str().is_empty() {
                continue;
            }
            match self.entries.get(dir) {
                Some(Entry::Dir) => {}
                Some(Entry::File(_)) => return Err(FsError::NotADirectory(dir.to_path_buf())),
                None => {
                    self.entries.insert(dir.to_path_buf(), Entry::Dir);
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryFs {
    inner: Mutex<Inner>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a directory and any missing ancestors.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.add_dir(path);
        self
    }

    /// Adds a file, creating its ancestors.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut inner = self.lock();
        if let Err(err) = inner.insert_dir_all(path.as_ref()) {
            tracing::warn!(error = %err, "memory fs: cannot add directory");
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        let mut inner = self.lock();
        if let Some(parent) = path.parent() {
            if let Err(err) = inner.insert_dir_all(parent) {
                tracing::warn!(error = %err, "memory fs: cannot add file");
                return;
            }
        }
        inner
            .entries
            .insert(path.to_path_buf(), Entry::File(content.to_string()));
    }

    /// Makes every `op` on `path` fail. `None` fails the op on any path.
    pub fn fail(&self, op: FsOp, path: Option<&Path>) {
        self.lock()
            .failures
            .push((op, path.map(Path::to_path_buf)));
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    pub fn calls(&self) -> Vec<FsCall> {
        self.lock().calls.clone()
    }

    pub fn calls_of(&self, op: FsOp) -> Vec<PathBuf> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.op == op)
            .map(|call| call.path.clone())
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.lock().entries.contains_key(path.as_ref())
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.lock().is_dir(path.as_ref())
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.lock().entries.get(path.as_ref()) {
            Some(Entry::File(text)) => Some(text.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl FsAdapter for MemoryFs {
    async fn list_directory(&self, path: &Path, options: ListOptions) -> Result<Vec<DirEntryInfo>> {
        let mut inner = self.lock();
        inner.record(FsOp::List, path)?;
        match inner.entries.get(path) {
            Some(Entry::Dir) => {}
            Some(Entry::File(_)) => return Err(FsError::NotADirectory(path.to_path_buf())),
            None => return Err(FsError::NotFound(path.to_path_buf())),
        }

        let entries = inner
            .entries
            .iter()
            .filter(|(key, _)| key.parent() == Some(path))
            .filter_map(|(key, entry)| {
                let name = key.file_name()?.to_string_lossy().to_string();
                Some(DirEntryInfo {
                    name,
                    is_dir: matches!(entry, Entry::Dir),
                })
            })
            .collect();

        Ok(filter_and_sort(entries, options))
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        let mut inner = self.lock();
        inner.record(FsOp::Read, path)?;
        match inner.entries.get(path) {
            Some(Entry::File(text)) => Ok(text.clone()),
            Some(Entry::Dir) => Err(FsError::Io(io::Error::other(format!(
                "{} is a directory",
                path.display()
            )))),
            None => Err(FsError::NotFound(path.to_path_buf())),
        }
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.record(FsOp::Write, path)?;
        inner.require_parent_dir(path)?;
        if inner.is_dir(path) {
            return Err(FsError::Io(io::Error::other(format!(
                "{} is a directory",
                path.display()
            ))));
        }
        inner
            .entries
            .insert(path.to_path_buf(), Entry::File(content.to_string()));
        Ok(())
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        let mut inner = self.lock();
        inner.record(FsOp::CreateDirectory, path)?;
        if let Some(Entry::File(_)) = inner.entries.get(path) {
            return Err(FsError::AlreadyExists(path.to_path_buf()));
        }
        inner.insert_dir_all(path)
    }

    async fn create_file(&self, path: &Path) -> Result<()> {
        let mut inner = self.lock();
        inner.record(FsOp::CreateFile, path)?;
        inner.require_parent_dir(path)?;
        if inner.entries.contains_key(path) {
            return Err(FsError::AlreadyExists(path.to_path_buf()));
        }
        inner
            .entries
            .insert(path.to_path_buf(), Entry::File(String::new()));
        Ok(())
    }

    async fn delete_recursive(&self, path: &Path) -> Result<()> {
        let mut inner = self.lock();
        inner.record(FsOp::Delete, path)?;
        if !inner.entries.contains_key(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        for key in inner.subtree_keys(path) {
            inner.entries.remove(&key);
        }
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let mut inner = self.lock();
        inner.record(FsOp::Rename, from)?;
        if !inner.entries.contains_key(from) {
            return Err(FsError::NotFound(from.to_path_buf()));
        }
        if inner.entries.contains_key(to) {
            return Err(FsError::AlreadyExists(to.to_path_buf()));
        }
        if to.starts_with(from) {
            return Err(FsError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot move {} into itself", from.display()),
            )));
        }
        inner.require_parent_dir(to)?;

        for key in inner.subtree_keys(from) {
            if let Some(entry) = inner.entries.remove(&key) {
                let Ok(rest) = key.strip_prefix(from) else {
                    continue;
                };
                let moved = if rest.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(rest)
                };
                inner.entries.insert(moved, entry);
            }
        }
        Ok(())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let mut inner = self.lock();
        inner.record(FsOp::Exists, path)?;
        Ok(inner.entries.contains_key(path))
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/memory.rs"]
mod tests;

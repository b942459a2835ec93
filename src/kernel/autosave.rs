//! Debounced document writes.
//!
//! One pending write at a time. Every edit restarts the timer; when it fires
//! the latest content is written through the file adapter. Failures of these
//! background writes come back through a channel the workspace drains.

use crate::kernel::services::ports::file::{FsAdapter, FsError};
use crate::kernel::state::rebase;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug)]
pub struct SaveFailure {
    pub path: PathBuf,
    pub error: FsError,
}

type Slot = Arc<Mutex<Option<PendingWrite>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<PendingWrite>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Autosave {
    fs: Arc<dyn FsAdapter>,
    delay: Duration,
    pending: Slot,
    timer: Option<JoinHandle<()>>,
    failures_tx: Sender<SaveFailure>,
    failures_rx: Receiver<SaveFailure>,
}

impl std::fmt::Debug for Autosave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autosave")
            .field("delay", &self.delay)
            .field("pending", &self.pending_path())
            .finish()
    }
}

impl Autosave {
    pub fn new(fs: Arc<dyn FsAdapter>) -> Self {
        Self::with_delay(fs, AUTOSAVE_DELAY)
    }

    pub fn with_delay(fs: Arc<dyn FsAdapter>, delay: Duration) -> Self {
        let (failures_tx, failures_rx) = mpsc::channel();
        Self {
            fs,
            delay,
            pending: Arc::new(Mutex::new(None)),
            timer: None,
            failures_tx,
            failures_rx,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending).is_some()
    }

    pub fn pending_path(&self) -> Option<PathBuf> {
        lock(&self.pending).as_ref().map(|write| write.path.clone())
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Replaces the pending content and restarts the timer.
    pub fn schedule(&mut self, path: &Path, content: &str) {
        self.cancel_timer();
        *lock(&self.pending) = Some(PendingWrite {
            path: path.to_path_buf(),
            content: content.to_string(),
        });

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime, autosave waits for an explicit flush");
            return;
        };

        let fs = Arc::clone(&self.fs);
        let pending = Arc::clone(&self.pending);
        let failures = self.failures_tx.clone();
        let delay = self.delay;
        self.timer = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let taken = lock(&pending).take();
            let Some(write) = taken else {
                return;
            };
            match fs.write_file(&write.path, &write.content).await {
                Ok(()) => tracing::debug!(path = %write.path.display(), "autosaved"),
                Err(error) => {
                    tracing::warn!(path = %write.path.display(), error = %error, "autosave failed");
                    let _ = failures.send(SaveFailure {
                        path: write.path,
                        error,
                    });
                }
            }
        }));
    }

    /// Writes the pending content now. `Ok(false)` when nothing was pending.
    pub async fn flush(&mut self) -> Result<bool, SaveFailure> {
        self.cancel_timer();
        let taken = lock(&self.pending).take();
        let Some(write) = taken else {
            return Ok(false);
        };
        self.fs
            .write_file(&write.path, &write.content)
            .await
            .map_err(|error| SaveFailure {
                path: write.path.clone(),
                error,
            })?;
        tracing::debug!(path = %write.path.display(), "flushed pending save");
        Ok(true)
    }

    /// Drops any pending write and writes `content` immediately.
    pub async fn save_now(&mut self, path: &Path, content: &str) -> Result<(), FsError> {
        self.cancel_timer();
        lock(&self.pending).take();
        self.fs.write_file(path, content).await
    }

    /// Follows a rename or move of the pending document.
    pub fn rebase(&mut self, from: &Path, to: &Path) {
        if let Some(write) = lock(&self.pending).as_mut() {
            if let Some(next) = rebase(&write.path, from, to) {
                write.path = next;
            }
        }
    }

    /// Drops the pending write if its document was deleted.
    pub fn discard_under(&mut self, path: &Path) {
        let mut pending = lock(&self.pending);
        if pending.as_ref().is_some_and(|write| write.path.starts_with(path)) {
            *pending = None;
            drop(pending);
            self.cancel_timer();
        }
    }

    pub fn drain_failures(&self) -> Vec<SaveFailure> {
        self.failures_rx.try_iter().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/autosave.rs"]
mod tests;

use std::path::PathBuf;

/// Side effects requested by pure state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadDir(PathBuf),
}

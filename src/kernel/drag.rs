//! Drag-and-drop reparenting: pure drop validation plus the drag session.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DropRejection {
    #[error("Cannot drop item onto itself")]
    OntoItself,
    #[error("Cannot move folder into its own subfolder")]
    IntoDescendant,
    #[error("Item is already in this folder")]
    SameParent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropValidation {
    pub valid: bool,
    /// Directory the item would land in: the target itself, or the parent of
    /// a file target.
    pub destination: PathBuf,
    pub reason: Option<DropRejection>,
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

pub fn validate_drop(
    dragged: &Path,
    dragged_is_dir: bool,
    target: &Path,
    target_is_dir: bool,
) -> DropValidation {
    let destination = if target_is_dir {
        target.to_path_buf()
    } else {
        parent_of(target)
    };

    let reason = if dragged == target {
        Some(DropRejection::OntoItself)
    } else if dragged_is_dir && destination.starts_with(dragged) {
        Some(DropRejection::IntoDescendant)
    } else if parent_of(dragged) == destination {
        Some(DropRejection::SameParent)
    } else {
        None
    };

    DropValidation {
        valid: reason.is_none(),
        destination,
        reason,
    }
}

/// A drop that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    pub dragged_path: Option<PathBuf>,
    pub dragged_is_dir: bool,
    pub drop_target: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub is_valid_drop: bool,
    pub rejection: Option<DropRejection>,
}

impl DragState {
    pub fn is_active(&self) -> bool {
        self.dragged_path.is_some()
    }

    pub fn start(&mut self, path: &Path, is_dir: bool) {
        *self = DragState {
            dragged_path: Some(path.to_path_buf()),
            dragged_is_dir: is_dir,
            ..DragState::default()
        };
    }

    /// Re-validates against the hovered entry; `None` means nothing is
    /// hovered. Returns `true` if anything changed.
    pub fn update_target(&mut self, target: Option<(&Path, bool)>) -> bool {
        let Some(dragged) = self.dragged_path.as_deref() else {
            return false;
        };
        let before = self.clone();

        match target {
            Some((target, target_is_dir)) => {
                let validation = validate_drop(dragged, self.dragged_is_dir, target, target_is_dir);
                self.drop_target = Some(target.to_path_buf());
                self.destination = Some(validation.destination);
                self.is_valid_drop = validation.valid;
                self.rejection = validation.reason;
            }
            None => {
                self.drop_target = None;
                self.destination = None;
                self.is_valid_drop = false;
                self.rejection = None;
            }
        }

        *self != before
    }

    /// The move a drop would commit now. `None` unless the current target is
    /// valid. The session stays active until [`DragState::cancel`].
    pub fn pending_move(&self) -> Option<MoveRequest> {
        if !self.is_valid_drop {
            return None;
        }
        Some(MoveRequest {
            source: self.dragged_path.clone()?,
            destination: self.destination.clone()?,
        })
    }

    pub fn cancel(&mut self) {
        *self = DragState::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/drag.rs"]
mod tests;

//! Inline create/rename editing and entry name validation.

use crate::kernel::services::ports::file::MARKDOWN_EXTENSION;
use crate::models::display_name;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditingState {
    #[default]
    Idle,
    CreatingFile {
        parent: PathBuf,
    },
    CreatingFolder {
        parent: PathBuf,
    },
    Renaming {
        parent: PathBuf,
        target: PathBuf,
        initial_value: String,
    },
}

impl EditingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditingState::Idle)
    }

    pub fn creating_file(parent: impl Into<PathBuf>) -> Self {
        EditingState::CreatingFile {
            parent: parent.into(),
        }
    }

    pub fn creating_folder(parent: impl Into<PathBuf>) -> Self {
        EditingState::CreatingFolder {
            parent: parent.into(),
        }
    }

    /// Rename of `target`, seeded with its current name.
    pub fn renaming(target: &Path) -> Self {
        EditingState::Renaming {
            parent: target.parent().map(Path::to_path_buf).unwrap_or_default(),
            target: target.to_path_buf(),
            initial_value: display_name(target),
        }
    }

    /// Directory the edit happens in.
    pub fn parent(&self) -> Option<&Path> {
        match self {
            EditingState::Idle => None,
            EditingState::CreatingFile { parent }
            | EditingState::CreatingFolder { parent }
            | EditingState::Renaming { parent, .. } => Some(parent),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,
    #[error("Invalid characters in name")]
    InvalidCharacters,
    #[error("Slash only allowed at end (to create folder)")]
    MisplacedSlash,
    #[error("Name cannot start with a dot")]
    HiddenName,
}

const INVALID_CHARS: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|'];

/// Checks a user-typed entry name. The first failing rule wins.
pub fn validate_name(input: &str, show_dotfiles: bool) -> Result<(), NameError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    if trimmed.contains(INVALID_CHARS) {
        return Err(NameError::InvalidCharacters);
    }
    if let Some(slash) = trimmed.find('/') {
        if slash + 1 < trimmed.len() {
            return Err(NameError::MisplacedSlash);
        }
    }
    if trimmed.starts_with('.') && !show_dotfiles {
        return Err(NameError::HiddenName);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryName {
    pub name: String,
    /// A trailing slash asks for a folder.
    pub as_folder: bool,
}

/// Validates `input` and splits off the trailing folder marker.
pub fn parse_entry_name(input: &str, show_dotfiles: bool) -> Result<EntryName, NameError> {
    validate_name(input, show_dotfiles)?;
    let trimmed = input.trim();
    let (name, as_folder) = match trimmed.strip_suffix('/') {
        Some(stem) => (stem.trim_end(), true),
        None => (trimmed, false),
    };
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    Ok(EntryName {
        name: name.to_string(),
        as_folder,
    })
}

/// File name to create for `name`: markdown unless it is a dotfile or
/// already carries the extension.
pub fn markdown_file_name(name: &str) -> String {
    if name.starts_with('.') || name.ends_with(MARKDOWN_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{MARKDOWN_EXTENSION}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/editing.rs"]
mod tests;

use crate::models::FileTreeRow;
use std::path::{Path, PathBuf};

/// Highlighted tree item. Independent of the file open in the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub item: Option<PathBuf>,
    pub is_dir: bool,
}

impl Selection {
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self {
            item: Some(path.into()),
            is_dir,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.item.as_deref()
    }

    pub fn clear(&mut self) {
        *self = Selection::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
}

/// Next selection when moving through the visible rows.
///
/// A selection that is missing or no longer visible lands on the first row.
/// Movement is clamped at both ends. `None` when there are no rows.
pub fn navigate(
    rows: &[FileTreeRow],
    selection: &Selection,
    direction: Direction,
) -> Option<Selection> {
    if rows.is_empty() {
        return None;
    }

    let current = selection
        .path()
        .and_then(|path| rows.iter().position(|row| row.path.as_path() == path));

    let next = match current {
        None => 0,
        Some(index) => match direction {
            Direction::Up => index.saturating_sub(1),
            Direction::Down => (index + 1).min(rows.len() - 1),
        },
    };

    let row = &rows[next];
    Some(Selection::new(row.path.clone(), row.is_dir))
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/navigation.rs"]
mod tests;

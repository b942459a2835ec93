//! Workspace state container.
//!
//! Pure transitions: nothing in here touches the file system. Methods return
//! whether the observable state changed and, where a directory listing is
//! needed, an [`Effect::LoadDir`] for the orchestrator to carry out.

use crate::kernel::drag::DragState;
use crate::kernel::editing::EditingState;
use crate::kernel::effect::Effect;
use crate::kernel::error::WorkspaceError;
use crate::kernel::navigation::{navigate, Direction, Selection};
use crate::kernel::services::ports::config::WorkspaceConfig;
use crate::models::{FileTree, FileTreeRow, LoadState, TreeNode};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct WorkspaceState {
    root: Option<PathBuf>,
    current_file: Option<PathBuf>,
    selection: Selection,
    tree: FileTree,
    config: WorkspaceConfig,
    is_loading: bool,
    editing: EditingState,
    drag: DragState,
    rows: Vec<FileTreeRow>,
    index_by_path: FxHashMap<PathBuf, usize>,
}

impl std::fmt::Debug for WorkspaceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceState")
            .field("root", &self.root)
            .field("current_file", &self.current_file)
            .field("selection", &self.selection)
            .field("rows_len", &self.rows.len())
            .field("editing", &self.editing)
            .finish()
    }
}

/// `path` re-rooted from `from` to `to`, if it is `from` or lies below it.
pub fn rebase(path: &Path, from: &Path, to: &Path) -> Option<PathBuf> {
    let rest = path.strip_prefix(from).ok()?;
    if rest.as_os_str().is_empty() {
        Some(to.to_path_buf())
    } else {
        Some(to.join(rest))
    }
}

impl WorkspaceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts over on `root` with an empty tree.
    pub fn open_root(&mut self, root: PathBuf, config: WorkspaceConfig) {
        *self = WorkspaceState {
            root: Some(root),
            config,
            is_loading: true,
            ..WorkspaceState::default()
        };
    }

    pub fn reset(&mut self) {
        *self = WorkspaceState::default();
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn is_root(&self, path: &Path) -> bool {
        self.root.as_deref() == Some(path)
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn editing(&self) -> &EditingState {
        &self.editing
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn drag_mut(&mut self) -> &mut DragState {
        &mut self.drag
    }

    pub fn rows(&self) -> &[FileTreeRow] {
        &self.rows
    }

    pub fn row_index(&self, path: &Path) -> Option<usize> {
        self.index_by_path.get(path).copied()
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.config.is_expanded(path)
    }

    pub fn show_dotfiles(&self) -> bool {
        self.config.show_dotfiles
    }

    pub fn set_config(&mut self, config: WorkspaceConfig) {
        self.config = config;
        self.refresh_rows();
    }

    pub fn set_show_dotfiles(&mut self, show: bool) -> bool {
        if self.config.show_dotfiles == show {
            return false;
        }
        self.config.show_dotfiles = show;
        true
    }

    pub fn set_sidebar_width(&mut self, width: u32) -> u32 {
        self.config.set_sidebar_width(width)
    }

    pub fn set_preview_enabled(&mut self, enabled: bool) -> bool {
        if self.config.preview_enabled == enabled {
            return false;
        }
        self.config.preview_enabled = enabled;
        true
    }

    pub fn set_tree(&mut self, nodes: Vec<TreeNode>) {
        self.tree.set_tree(nodes);
        self.refresh_rows();
    }

    pub fn apply_root_loaded(&mut self, children: Vec<TreeNode>) {
        self.tree.update_roots(children);
        self.is_loading = false;
        self.refresh_rows();
    }

    /// `false` when the directory is gone from the tree; the listing is
    /// dropped.
    pub fn apply_dir_loaded(&mut self, path: &Path, children: Vec<TreeNode>) -> bool {
        if !self.tree.update_subtree(path, children) {
            return false;
        }
        self.refresh_rows();
        true
    }

    /// A directory that never loaded goes back to `NotLoaded` and collapses;
    /// one that was loaded before keeps its last listing.
    pub fn apply_dir_load_error(&mut self, path: &Path) -> bool {
        if !self.tree.is_dir(path) {
            return false;
        }
        if self.tree.has_listing(path) {
            self.tree.set_load_state(path, LoadState::Loaded);
        } else {
            self.tree.set_load_state(path, LoadState::NotLoaded);
            self.config.collapse(path);
        }
        self.refresh_rows();
        true
    }

    fn load_effect(&mut self, path: &Path) -> Vec<Effect> {
        if self.tree.load_state(path) == Some(LoadState::NotLoaded) {
            self.tree.set_load_state(path, LoadState::Loading);
            return vec![Effect::LoadDir(path.to_path_buf())];
        }
        Vec::new()
    }

    /// Flips `path` in the expansion set. Expanding a directory that has not
    /// been listed yet asks for its listing.
    pub fn toggle_folder(&mut self, path: &Path) -> (bool, Vec<Effect>) {
        let expanded = self.config.toggle_expanded(path);
        let effects = if expanded {
            self.load_effect(path)
        } else {
            Vec::new()
        };
        self.refresh_rows();
        (true, effects)
    }

    pub fn expand(&mut self, path: &Path) -> (bool, Vec<Effect>) {
        let changed = self.config.expand(path);
        let effects = self.load_effect(path);
        if changed || !effects.is_empty() {
            self.refresh_rows();
        }
        (changed, effects)
    }

    /// Collapsing never unloads children.
    pub fn collapse(&mut self, path: &Path) -> bool {
        if !self.config.collapse(path) {
            return false;
        }
        self.refresh_rows();
        true
    }

    /// Expanded directories that are visible but were never listed.
    pub fn pending_loads(&self) -> Vec<PathBuf> {
        self.rows
            .iter()
            .filter(|row| row.is_dir && row.is_expanded && row.load_state == LoadState::NotLoaded)
            .map(|row| row.path.clone())
            .collect()
    }

    pub fn mark_loading(&mut self, path: &Path) -> bool {
        self.tree.set_load_state(path, LoadState::Loading)
    }

    pub fn select(&mut self, selection: Selection) -> bool {
        if self.selection == selection {
            return false;
        }
        self.selection = selection;
        true
    }

    pub fn move_selection(&mut self, direction: Direction) -> bool {
        match navigate(&self.rows, &self.selection, direction) {
            Some(next) => self.select(next),
            None => false,
        }
    }

    pub fn selected_row(&self) -> Option<&FileTreeRow> {
        let path = self.selection.path()?;
        self.row_index(path).and_then(|index| self.rows.get(index))
    }

    /// Also remembered as the file to reopen next time.
    pub fn set_current_file(&mut self, path: Option<PathBuf>) -> bool {
        self.config.last_opened_file = path.clone();
        if self.current_file == path {
            return false;
        }
        self.current_file = path;
        true
    }

    pub fn begin_edit(&mut self, editing: EditingState) -> Result<(), WorkspaceError> {
        if !self.editing.is_idle() {
            return Err(WorkspaceError::EditingInProgress);
        }
        self.editing = editing;
        Ok(())
    }

    pub fn take_edit(&mut self) -> EditingState {
        std::mem::take(&mut self.editing)
    }

    pub fn cancel_edit(&mut self) -> bool {
        !self.take_edit().is_idle()
    }

    /// Re-roots every remembered path under `from` onto `to` after a rename
    /// or move. Content is not reread.
    pub fn rewrite_prefix(&mut self, from: &Path, to: &Path) -> bool {
        let mut changed = false;

        if let Some(next) = self.current_file.as_deref().and_then(|p| rebase(p, from, to)) {
            self.current_file = Some(next);
            changed = true;
        }
        if let Some(next) = self
            .config
            .last_opened_file
            .as_deref()
            .and_then(|p| rebase(p, from, to))
        {
            self.config.last_opened_file = Some(next);
        }
        if let Some(next) = self.selection.path().and_then(|p| rebase(p, from, to)) {
            self.selection.item = Some(next);
            changed = true;
        }
        for folder in &mut self.config.expanded_folders {
            if let Some(next) = rebase(folder, from, to) {
                *folder = next;
                changed = true;
            }
        }

        if changed {
            self.refresh_rows();
        }
        changed
    }

    /// Forgets every remembered path at or under a deleted `path`.
    pub fn forget_prefix(&mut self, path: &Path) -> bool {
        let mut changed = false;

        if self.current_file.as_deref().is_some_and(|p| p.starts_with(path)) {
            self.current_file = None;
            changed = true;
        }
        if self
            .config
            .last_opened_file
            .as_deref()
            .is_some_and(|p| p.starts_with(path))
        {
            self.config.last_opened_file = None;
        }
        if self.selection.path().is_some_and(|p| p.starts_with(path)) {
            self.selection.clear();
            changed = true;
        }
        let before = self.config.expanded_folders.len();
        self.config.expanded_folders.retain(|p| !p.starts_with(path));
        changed |= before != self.config.expanded_folders.len();

        if changed {
            self.refresh_rows();
        }
        changed
    }

    /// Where a new entry or a shell command should land: the selected
    /// directory, else the selected item's parent, else the open file's
    /// parent, else the root.
    pub fn current_directory(&self) -> Option<PathBuf> {
        if let Some(path) = self.selection.path() {
            if self.selection.is_dir {
                return Some(path.to_path_buf());
            }
            if let Some(parent) = path.parent() {
                return Some(parent.to_path_buf());
            }
        }
        if let Some(parent) = self.current_file.as_deref().and_then(Path::parent) {
            return Some(parent.to_path_buf());
        }
        self.root.clone()
    }

    fn refresh_rows(&mut self) {
        self.rows = self.tree.flatten(&self.config.expanded_folders);

        self.index_by_path.clear();
        self.index_by_path.reserve(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            self.index_by_path.insert(row.path.clone(), i);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;

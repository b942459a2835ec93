//! Workspace orchestrator.
//!
//! Turns user intents into file adapter calls and keeps the in-memory tree in
//! step with what the adapter reports. Every action takes `&mut self`, so
//! actions never interleave; an action either completes or stops at its next
//! await point.

use crate::kernel::autosave::{Autosave, SaveFailure};
use crate::kernel::drag::{validate_drop, MoveRequest};
use crate::kernel::editing::{
    markdown_file_name, parse_entry_name, validate_name, EditingState, NameError,
};
use crate::kernel::effect::Effect;
use crate::kernel::error::{WorkspaceError, WorkspaceResult};
use crate::kernel::navigation::{Direction, Selection, SidebarKey};
use crate::kernel::notifications::Notifications;
use crate::kernel::services::adapters::config::{load_workspace_config, save_workspace_config};
use crate::kernel::services::ports::editor::EditorSurface;
use crate::kernel::services::ports::file::{DirEntryInfo, FsAdapter, FsError, ListOptions};
use crate::kernel::state::WorkspaceState;
use crate::models::{display_name, FileTreeRow, TreeNode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Upper bound on quick-find results.
pub const QUICK_FIND_LIMIT: usize = 20;

fn to_nodes(parent: &Path, entries: Vec<DirEntryInfo>) -> Vec<TreeNode> {
    entries
        .into_iter()
        .map(|entry| {
            let path = parent.join(&entry.name);
            if entry.is_dir {
                TreeNode::dir(path)
            } else {
                TreeNode::file(path)
            }
        })
        .collect()
}

fn mutation_error(op: &'static str, path: &Path, err: FsError) -> WorkspaceError {
    match err {
        FsError::AlreadyExists(existing) => WorkspaceError::Conflict(existing),
        other => WorkspaceError::adapter(op, path, other),
    }
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

pub struct Workspace {
    fs: Arc<dyn FsAdapter>,
    state: WorkspaceState,
    autosave: Autosave,
    notifications: Notifications,
    editor: Option<Box<dyn EditorSurface + Send>>,
    document: Option<String>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("state", &self.state)
            .field("autosave", &self.autosave)
            .field("has_editor", &self.editor.is_some())
            .finish()
    }
}

impl Workspace {
    pub fn new(fs: Arc<dyn FsAdapter>) -> Self {
        let autosave = Autosave::new(Arc::clone(&fs));
        Self::with_autosave(fs, autosave)
    }

    pub fn with_autosave_delay(fs: Arc<dyn FsAdapter>, delay: Duration) -> Self {
        let autosave = Autosave::with_delay(Arc::clone(&fs), delay);
        Self::with_autosave(fs, autosave)
    }

    fn with_autosave(fs: Arc<dyn FsAdapter>, autosave: Autosave) -> Self {
        Self {
            fs,
            state: WorkspaceState::new(),
            autosave,
            notifications: Notifications::new(),
            editor: None,
            document: None,
        }
    }

    pub fn attach_editor(&mut self, editor: Box<dyn EditorSurface + Send>) {
        self.editor = Some(editor);
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn rows(&self) -> &[FileTreeRow] {
        self.state.rows()
    }

    pub fn root(&self) -> Option<&Path> {
        self.state.root()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.state.current_file()
    }

    /// Last content known for the open file.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn fs(&self) -> &Arc<dyn FsAdapter> {
        &self.fs
    }

    fn require_root(&self) -> WorkspaceResult<PathBuf> {
        self.state
            .root()
            .map(Path::to_path_buf)
            .ok_or(WorkspaceError::NoWorkspace)
    }

    fn list_options(&self) -> ListOptions {
        ListOptions {
            show_dotfiles: self.state.show_dotfiles(),
        }
    }

    /// Pushes conflict and adapter errors to the notification queue. Name
    /// validation errors stay inline.
    fn report<T>(&mut self, result: WorkspaceResult<T>) -> WorkspaceResult<T> {
        if let Err(err) = &result {
            if err.is_reportable() {
                tracing::warn!(error = %err, "workspace action failed");
                self.notifications.error(err.to_string());
            }
        }
        result
    }

    fn report_save_failure(&mut self, failure: SaveFailure) -> WorkspaceError {
        let err = WorkspaceError::adapter("save", failure.path, failure.error);
        tracing::warn!(error = %err, "save failed");
        self.notifications.error(err.to_string());
        err
    }

    fn show_document(&mut self, text: Option<String>) {
        if let Some(editor) = self.editor.as_mut() {
            editor.set_document(text.as_deref().unwrap_or_default());
        }
        self.document = text;
    }

    // ---- lifecycle -------------------------------------------------------

    /// Opens `root`, replacing any open workspace.
    pub async fn open(&mut self, root: impl Into<PathBuf>) -> WorkspaceResult<()> {
        let root = root.into();
        if self.state.root().is_some() {
            self.close().await;
        }

        let config = load_workspace_config(self.fs.as_ref(), &root).await;
        self.state.open_root(root.clone(), config);

        let listed = self.reload_root().await;
        if listed.is_err() {
            self.state.set_loading(false);
            return listed;
        }
        self.load_pending().await;

        if let Some(last) = self.state.config().last_opened_file.clone() {
            match self.fs.exists(&last).await {
                Ok(true) => {
                    if let Err(err) = self.open_file(&last).await {
                        tracing::warn!(path = %last.display(), error = %err, "cannot reopen last file");
                    }
                }
                _ => {
                    tracing::debug!(path = %last.display(), "last opened file is gone");
                    self.state.set_current_file(None);
                }
            }
        }

        tracing::info!(root = %root.display(), rows = self.rows().len(), "workspace opened");
        Ok(())
    }

    /// Flushes pending edits, persists the config and forgets the workspace.
    pub async fn close(&mut self) {
        if self.state.root().is_none() {
            return;
        }
        if let Err(failure) = self.autosave.flush().await {
            self.report_save_failure(failure);
        }
        if let Err(err) = self.save_config().await {
            tracing::debug!(error = %err, "config not saved on close");
        }
        tracing::info!(root = ?self.state.root(), "workspace closed");
        self.state.reset();
        self.show_document(None);
    }

    pub async fn save_config(&mut self) -> WorkspaceResult<()> {
        let root = self.require_root()?;
        let result = save_workspace_config(self.fs.as_ref(), &root, self.state.config())
            .await
            .map_err(|err| WorkspaceError::adapter("save config", &root, err));
        self.report(result)
    }

    /// Saves the config after a view setting changed. A failure is already
    /// notified and does not undo the setting.
    async fn persist_config(&mut self) {
        if let Err(err) = self.save_config().await {
            tracing::debug!(error = %err, "view setting kept in memory only");
        }
    }

    // ---- tree loading ----------------------------------------------------

    pub async fn reload_root(&mut self) -> WorkspaceResult<()> {
        let root = self.require_root()?;
        let result = self.fs.list_directory(&root, self.list_options()).await;
        match result {
            Ok(entries) => {
                self.state.apply_root_loaded(to_nodes(&root, entries));
                Ok(())
            }
            Err(err) => {
                let err = WorkspaceError::adapter("list", &root, err);
                self.report(Err(err))
            }
        }
    }

    async fn load_dir_inner(&mut self, path: &Path) -> WorkspaceResult<()> {
        self.state.mark_loading(path);
        match self.fs.list_directory(path, self.list_options()).await {
            Ok(entries) => {
                if !self.state.apply_dir_loaded(path, to_nodes(path, entries)) {
                    tracing::debug!(path = %path.display(), "listing arrived for a removed folder");
                }
                Ok(())
            }
            Err(err) => {
                self.state.apply_dir_load_error(path);
                Err(WorkspaceError::adapter("list", path, err))
            }
        }
    }

    /// Lists one directory and splices it into the tree.
    pub async fn load_directory(&mut self, path: &Path) -> WorkspaceResult<()> {
        let result = self.load_dir_inner(path).await;
        self.report(result)
    }

    /// Loads every expanded folder that is visible but was never listed,
    /// repeating as nested expansions become visible.
    async fn load_pending(&mut self) {
        loop {
            let pending = self.state.pending_loads();
            if pending.is_empty() {
                break;
            }
            for path in pending {
                if let Err(err) = self.load_dir_inner(&path).await {
                    tracing::warn!(path = %path.display(), error = %err, "cannot restore folder");
                }
            }
        }
    }

    async fn reload_parent(&mut self, parent: &Path) -> WorkspaceResult<()> {
        if self.state.is_root(parent) {
            self.reload_root().await
        } else if self.state.tree().is_dir(parent) {
            self.load_directory(parent).await
        } else {
            Ok(())
        }
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) -> WorkspaceResult<()> {
        for effect in effects {
            match effect {
                Effect::LoadDir(path) => self.load_directory(&path).await?,
            }
        }
        Ok(())
    }

    pub async fn toggle_folder(&mut self, path: &Path) -> WorkspaceResult<bool> {
        let (changed, effects) = self.state.toggle_folder(path);
        self.run_effects(effects).await?;
        Ok(changed)
    }

    async fn expand_folder(&mut self, path: &Path) -> WorkspaceResult<()> {
        let (_, effects) = self.state.expand(path);
        self.run_effects(effects).await
    }

    /// Re-lists the root and every folder loaded so far.
    pub async fn refresh(&mut self) -> WorkspaceResult<()> {
        self.reload_root().await?;
        for dir in self.state.tree().loaded_dirs() {
            if let Err(err) = self.load_dir_inner(&dir).await {
                tracing::warn!(path = %dir.display(), error = %err, "refresh failed for folder");
            }
        }
        self.load_pending().await;
        Ok(())
    }

    // ---- selection and documents -----------------------------------------

    /// Selects an item and opens it if it is a file.
    pub async fn select(&mut self, path: &Path, is_dir: bool) -> WorkspaceResult<()> {
        self.state.select(Selection::new(path, is_dir));
        if !is_dir {
            self.open_file(path).await?;
        }
        Ok(())
    }

    /// Opens `path` in the editor. A pending save of the previous document is
    /// written first; if that fails the switch does not happen.
    pub async fn open_file(&mut self, path: &Path) -> WorkspaceResult<()> {
        if self.state.current_file() == Some(path) && self.document.is_some() {
            return Ok(());
        }
        if let Err(failure) = self.autosave.flush().await {
            return Err(self.report_save_failure(failure));
        }

        let text = match self.fs.read_file(path).await {
            Ok(text) => text,
            Err(err) => return self.report(Err(WorkspaceError::adapter("open", path, err))),
        };
        self.state.set_current_file(Some(path.to_path_buf()));
        self.show_document(Some(text));
        tracing::debug!(path = %path.display(), "file opened");
        Ok(())
    }

    pub fn navigate(&mut self, direction: Direction) -> bool {
        self.state.move_selection(direction)
    }

    /// Keyboard handling for the focused tree. Keys are ignored while an
    /// inline edit is active.
    pub async fn handle_sidebar_key(&mut self, key: SidebarKey) -> WorkspaceResult<bool> {
        if !self.state.editing().is_idle() {
            return Ok(false);
        }

        match key {
            SidebarKey::Up => Ok(self.navigate(Direction::Up)),
            SidebarKey::Down => Ok(self.navigate(Direction::Down)),
            SidebarKey::Left => {
                let Some(row) = self.state.selected_row().cloned() else {
                    return Ok(false);
                };
                if row.is_dir && row.is_expanded {
                    return Ok(self.state.collapse(&row.path));
                }
                Ok(false)
            }
            SidebarKey::Right => {
                let Some(row) = self.state.selected_row().cloned() else {
                    return Ok(false);
                };
                if row.is_dir && !row.is_expanded {
                    self.expand_folder(&row.path).await?;
                    return Ok(true);
                }
                Ok(false)
            }
            SidebarKey::Enter => {
                let Some(row) = self.state.selected_row().cloned() else {
                    return Ok(false);
                };
                self.select(&row.path, row.is_dir).await?;
                Ok(true)
            }
        }
    }

    /// Records an edit of the open document and schedules a save.
    pub fn content_changed(&mut self, text: &str) {
        let Some(path) = self.state.current_file().map(Path::to_path_buf) else {
            return;
        };
        self.document = Some(text.to_string());
        self.autosave.schedule(&path, text);
    }

    /// Writes the open document now, cancelling any scheduled save.
    pub async fn save(&mut self) -> WorkspaceResult<bool> {
        let (Some(path), Some(text)) = (
            self.state.current_file().map(Path::to_path_buf),
            self.document.clone(),
        ) else {
            return Ok(false);
        };
        let result = self
            .autosave
            .save_now(&path, &text)
            .await
            .map(|()| true)
            .map_err(|err| WorkspaceError::adapter("save", &path, err));
        self.report(result)
    }

    /// Writes a scheduled autosave now. `Ok(false)` when nothing was pending.
    pub async fn flush_autosave(&mut self) -> WorkspaceResult<bool> {
        match self.autosave.flush().await {
            Ok(written) => Ok(written),
            Err(failure) => Err(self.report_save_failure(failure)),
        }
    }

    /// Reports failures of background saves and expires old notifications.
    pub fn poll_background(&mut self) {
        for failure in self.autosave.drain_failures() {
            self.report_save_failure(failure);
        }
        self.notifications.expire(Instant::now());
    }

    // ---- inline editing --------------------------------------------------

    async fn begin_create(&mut self, editing: EditingState) -> WorkspaceResult<()> {
        self.require_root()?;
        let parent = editing.parent().map(Path::to_path_buf).unwrap_or_default();
        self.state.begin_edit(editing)?;
        if !self.state.is_root(&parent) {
            if let Err(err) = self.expand_folder(&parent).await {
                self.state.take_edit();
                return Err(err);
            }
        }
        Ok(())
    }

    pub async fn start_creating_file(&mut self, parent: &Path) -> WorkspaceResult<()> {
        self.begin_create(EditingState::creating_file(parent)).await
    }

    pub async fn start_creating_folder(&mut self, parent: &Path) -> WorkspaceResult<()> {
        self.begin_create(EditingState::creating_folder(parent)).await
    }

    /// "New file" without an explicit parent: see
    /// [`WorkspaceState::current_directory`].
    pub async fn new_file_here(&mut self) -> WorkspaceResult<()> {
        let parent = self
            .state
            .current_directory()
            .ok_or(WorkspaceError::NoWorkspace)?;
        self.start_creating_file(&parent).await
    }

    pub async fn new_folder_here(&mut self) -> WorkspaceResult<()> {
        let parent = self
            .state
            .current_directory()
            .ok_or(WorkspaceError::NoWorkspace)?;
        self.start_creating_folder(&parent).await
    }

    pub fn start_renaming(&mut self, target: &Path) -> WorkspaceResult<()> {
        self.require_root()?;
        self.state.begin_edit(EditingState::renaming(target))
    }

    pub fn cancel_editing(&mut self) -> bool {
        self.state.cancel_edit()
    }

    /// Commits the active inline edit with the typed `input`.
    ///
    /// A validation error leaves the edit active so it can be corrected. Any
    /// other outcome ends the edit.
    pub async fn confirm_editing(&mut self, input: &str) -> WorkspaceResult<PathBuf> {
        let show_dotfiles = self.state.show_dotfiles();
        match self.state.editing().clone() {
            EditingState::Idle => Err(WorkspaceError::NotEditing),
            EditingState::CreatingFile { parent } | EditingState::CreatingFolder { parent } => {
                let as_folder_edit = matches!(
                    self.state.editing(),
                    EditingState::CreatingFolder { .. }
                );
                let entry = parse_entry_name(input, show_dotfiles)?;
                if entry.as_folder || as_folder_edit {
                    self.create_folder(&parent, &entry.name).await
                } else {
                    self.create_file(&parent, &entry.name).await
                }
            }
            EditingState::Renaming {
                target,
                initial_value,
                ..
            } => {
                let entry = parse_entry_name(input, show_dotfiles)?;
                if entry.name == initial_value {
                    self.state.take_edit();
                    return Ok(target);
                }
                self.rename(&target, &entry.name).await
            }
        }
    }

    // ---- mutations -------------------------------------------------------

    /// Fails with `Conflict` if `path` exists. A failing check is not fatal:
    /// the mutation goes ahead and the adapter has the final say.
    async fn ensure_vacant(&self, path: &Path) -> WorkspaceResult<()> {
        match self.fs.exists(path).await {
            Ok(true) => Err(WorkspaceError::Conflict(path.to_path_buf())),
            Ok(false) => Ok(()),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "existence check failed");
                Ok(())
            }
        }
    }

    fn check_name(&self, name: &str) -> Result<(), NameError> {
        validate_name(name, self.state.show_dotfiles())?;
        if name.contains('/') {
            return Err(NameError::MisplacedSlash);
        }
        Ok(())
    }

    /// Creates `<parent>/<name>.md` (see [`markdown_file_name`]), then selects
    /// and opens it.
    pub async fn create_file(&mut self, parent: &Path, name: &str) -> WorkspaceResult<PathBuf> {
        let result = self.create_file_inner(parent, name.trim()).await;
        self.state.take_edit();
        self.report(result)
    }

    async fn create_file_inner(&mut self, parent: &Path, name: &str) -> WorkspaceResult<PathBuf> {
        self.require_root()?;
        self.check_name(name)?;
        let path = parent.join(markdown_file_name(name));
        self.ensure_vacant(&path).await?;
        self.fs
            .create_file(&path)
            .await
            .map_err(|err| mutation_error("create", &path, err))?;
        tracing::info!(path = %path.display(), "file created");

        self.reload_parent(parent).await?;
        self.state.select(Selection::new(&path, false));
        self.open_file(&path).await?;
        Ok(path)
    }

    pub async fn create_folder(&mut self, parent: &Path, name: &str) -> WorkspaceResult<PathBuf> {
        let result = self.create_folder_inner(parent, name.trim()).await;
        self.state.take_edit();
        self.report(result)
    }

    async fn create_folder_inner(&mut self, parent: &Path, name: &str) -> WorkspaceResult<PathBuf> {
        self.require_root()?;
        self.check_name(name)?;
        let path = parent.join(name);
        self.ensure_vacant(&path).await?;
        self.fs
            .create_directory(&path)
            .await
            .map_err(|err| mutation_error("create", &path, err))?;
        tracing::info!(path = %path.display(), "folder created");

        self.reload_parent(parent).await?;
        Ok(path)
    }

    /// Renames `path` within its folder. Paths remembered under the old name,
    /// including the open file, follow it; the document is not reread.
    pub async fn rename(&mut self, path: &Path, new_name: &str) -> WorkspaceResult<PathBuf> {
        let result = self.rename_inner(path, new_name.trim()).await;
        self.state.take_edit();
        self.report(result)
    }

    async fn rename_inner(&mut self, path: &Path, new_name: &str) -> WorkspaceResult<PathBuf> {
        self.require_root()?;
        self.check_name(new_name)?;
        let parent = parent_of(path);
        let new_path = parent.join(new_name);
        if new_path == path {
            return Ok(new_path);
        }
        self.relocate(path, &new_path, "rename").await?;
        self.reload_parent(&parent).await?;
        self.load_pending().await;
        Ok(new_path)
    }

    async fn relocate(&mut self, from: &Path, to: &Path, op: &'static str) -> WorkspaceResult<()> {
        self.ensure_vacant(to).await?;
        self.fs
            .rename(from, to)
            .await
            .map_err(|err| mutation_error(op, from, err))?;
        tracing::info!(from = %from.display(), to = %to.display(), "{op} done");

        self.autosave.rebase(from, to);
        self.state.rewrite_prefix(from, to);
        Ok(())
    }

    /// Deletes `path` and everything below it. Forgets the open file if it
    /// was inside.
    pub async fn delete(&mut self, path: &Path) -> WorkspaceResult<()> {
        let result = self.delete_inner(path).await;
        self.state.take_edit();
        self.report(result)
    }

    async fn delete_inner(&mut self, path: &Path) -> WorkspaceResult<()> {
        self.require_root()?;
        self.fs
            .delete_recursive(path)
            .await
            .map_err(|err| WorkspaceError::adapter("delete", path, err))?;
        tracing::info!(path = %path.display(), "deleted");

        self.autosave.discard_under(path);
        let had_file = self.state.current_file().is_some();
        self.state.forget_prefix(path);
        if had_file && self.state.current_file().is_none() {
            self.show_document(None);
        }
        self.reload_parent(&parent_of(path)).await
    }

    /// Moves `path` into the folder `destination`, which is then expanded.
    pub async fn move_item(&mut self, path: &Path, destination: &Path) -> WorkspaceResult<PathBuf> {
        let result = self.move_inner(path, destination).await;
        self.state.drag_mut().cancel();
        self.report(result)
    }

    async fn move_inner(&mut self, path: &Path, destination: &Path) -> WorkspaceResult<PathBuf> {
        self.require_root()?;
        let is_dir = self.state.tree().is_dir(path);
        let validation = validate_drop(path, is_dir, destination, true);
        if let Some(reason) = validation.reason {
            return Err(WorkspaceError::InvalidMove(reason));
        }

        let new_path = destination.join(display_name(path));
        self.relocate(path, &new_path, "move").await?;

        self.reload_parent(&parent_of(path)).await?;
        self.reload_parent(destination).await?;
        if !self.state.is_root(destination) {
            self.expand_folder(destination).await?;
        }
        self.load_pending().await;
        Ok(new_path)
    }

    // ---- drag and drop ---------------------------------------------------

    pub fn start_drag(&mut self, path: &Path, is_dir: bool) {
        self.state.drag_mut().start(path, is_dir);
    }

    pub fn drag_over(&mut self, target: Option<(&Path, bool)>) -> bool {
        self.state.drag_mut().update_target(target)
    }

    pub fn cancel_drag(&mut self) {
        self.state.drag_mut().cancel();
    }

    /// Drops onto the current target. `Ok(None)` when the target was not a
    /// valid drop.
    pub async fn end_drag(&mut self) -> WorkspaceResult<Option<PathBuf>> {
        let Some(MoveRequest {
            source,
            destination,
        }) = self.state.drag().pending_move()
        else {
            self.state.drag_mut().cancel();
            return Ok(None);
        };
        self.move_item(&source, &destination).await.map(Some)
    }

    // ---- view settings ---------------------------------------------------

    /// Flips dotfile visibility, persists it and re-lists what is loaded.
    pub async fn toggle_dotfiles(&mut self) -> WorkspaceResult<bool> {
        self.require_root()?;
        let show = !self.state.show_dotfiles();
        self.state.set_show_dotfiles(show);
        self.persist_config().await;
        self.refresh().await?;
        Ok(show)
    }

    pub async fn set_sidebar_width(&mut self, width: u32) -> WorkspaceResult<u32> {
        self.require_root()?;
        let width = self.state.set_sidebar_width(width);
        self.persist_config().await;
        Ok(width)
    }

    pub async fn set_preview_enabled(&mut self, enabled: bool) -> WorkspaceResult<bool> {
        self.require_root()?;
        if self.state.set_preview_enabled(enabled) {
            self.persist_config().await;
        }
        Ok(enabled)
    }

    pub async fn toggle_preview(&mut self) -> WorkspaceResult<bool> {
        let enabled = !self.state.config().preview_enabled;
        self.set_preview_enabled(enabled).await
    }

    /// Loaded files whose name contains `query`, ignoring case.
    pub fn quick_find(&self, query: &str) -> Vec<PathBuf> {
        let query = query.trim().to_lowercase();
        self.state
            .tree()
            .files()
            .into_iter()
            .filter(|path| query.is_empty() || display_name(path).to_lowercase().contains(&query))
            .take(QUICK_FIND_LIMIT)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/workspace.rs"]
mod tests;

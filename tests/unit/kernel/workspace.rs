use super::*;
use crate::kernel::drag::DropRejection;
use crate::kernel::notifications::NotificationKind;
use crate::kernel::services::adapters::file::{FsOp, MemoryFs};
use crate::models::LoadState;
use std::sync::Mutex;

#[derive(Clone, Default)]
struct RecordingEditor(Arc<Mutex<Vec<String>>>);

impl RecordingEditor {
    fn last(&self) -> Option<String> {
        self.0.lock().unwrap().last().cloned()
    }
}

impl EditorSurface for RecordingEditor {
    fn set_document(&mut self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

fn p(path: &str) -> PathBuf {
    PathBuf::from(path)
}

fn fixture() -> Arc<MemoryFs> {
    Arc::new(
        MemoryFs::new()
            .with_file("/ws/docs/a.md", "A")
            .with_file("/ws/docs/sub/b.md", "B")
            .with_file("/ws/readme.md", "R")
            .with_file("/ws/.hidden.md", "H")
            .with_file("/ws/image.png", ""),
    )
}

async fn opened(fs: &Arc<MemoryFs>) -> Workspace {
    let mut workspace = Workspace::new(fs.clone());
    workspace.open("/ws").await.unwrap();
    workspace
}

fn row_paths(workspace: &Workspace) -> Vec<PathBuf> {
    workspace.rows().iter().map(|row| row.path.clone()).collect()
}

#[tokio::test]
async fn test_open_lists_only_the_root() {
    let fs = fixture();
    let workspace = opened(&fs).await;

    assert_eq!(row_paths(&workspace), vec![p("/ws/docs"), p("/ws/readme.md")]);
    assert_eq!(fs.calls_of(FsOp::List), vec![p("/ws")]);
    assert!(!workspace.state().is_loading());
    assert!(workspace.current_file().is_none());
}

#[tokio::test]
async fn test_toggle_folder_lists_once() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    let docs = Path::new("/ws/docs");

    workspace.toggle_folder(docs).await.unwrap();
    assert_eq!(
        row_paths(&workspace),
        vec![
            p("/ws/docs"),
            p("/ws/docs/sub"),
            p("/ws/docs/a.md"),
            p("/ws/readme.md")
        ]
    );

    workspace.toggle_folder(docs).await.unwrap();
    workspace.toggle_folder(docs).await.unwrap();
    assert_eq!(fs.calls_of(FsOp::List), vec![p("/ws"), p("/ws/docs")]);
    assert_eq!(
        workspace.state().tree().load_state(docs),
        Some(LoadState::Loaded)
    );
}

#[tokio::test]
async fn test_failed_folder_load_collapses_and_notifies() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    fs.fail(FsOp::List, Some(Path::new("/ws/docs")));

    let err = workspace.toggle_folder(Path::new("/ws/docs")).await;
    assert!(matches!(err, Err(WorkspaceError::Adapter { .. })));
    assert!(!workspace.state().is_expanded(Path::new("/ws/docs")));
    assert_eq!(
        workspace.state().tree().load_state(Path::new("/ws/docs")),
        Some(LoadState::NotLoaded)
    );
    assert_eq!(
        workspace.notifications().last().map(|n| n.kind),
        Some(NotificationKind::Error)
    );
}

#[tokio::test]
async fn test_failed_parent_load_abandons_create() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    fs.fail(FsOp::List, Some(Path::new("/ws/docs")));

    let err = workspace.start_creating_file(Path::new("/ws/docs")).await;
    assert!(matches!(err, Err(WorkspaceError::Adapter { .. })));
    assert!(workspace.state().editing().is_idle());
    assert!(!workspace.state().is_expanded(Path::new("/ws/docs")));

    fs.clear_failures();
    workspace
        .start_creating_folder(Path::new("/ws"))
        .await
        .unwrap();
    assert_eq!(
        workspace.state().editing(),
        &EditingState::creating_folder("/ws")
    );
}

#[tokio::test]
async fn test_open_restores_expanded_folders_and_last_file() {
    let fs = fixture();
    fs.add_file(
        "/ws/.mdeditor.json",
        r#"{"expandedFolders":["/ws/docs","/ws/docs/sub"],"lastOpenedFile":"/ws/docs/sub/b.md"}"#,
    );
    let editor = RecordingEditor::default();
    let mut workspace = Workspace::new(fs.clone());
    workspace.attach_editor(Box::new(editor.clone()));

    workspace.open("/ws").await.unwrap();

    assert!(row_paths(&workspace).contains(&p("/ws/docs/sub/b.md")));
    assert_eq!(workspace.current_file(), Some(Path::new("/ws/docs/sub/b.md")));
    assert_eq!(workspace.document(), Some("B"));
    assert_eq!(editor.last().as_deref(), Some("B"));
}

#[tokio::test]
async fn test_missing_last_file_is_forgotten() {
    let fs = fixture();
    fs.add_file("/ws/.mdeditor.json", r#"{"lastOpenedFile":"/ws/gone.md"}"#);
    let workspace = opened(&fs).await;

    assert!(workspace.current_file().is_none());
    assert!(workspace.state().config().last_opened_file.is_none());
    assert!(!fs.calls_of(FsOp::Read).contains(&p("/ws/gone.md")));
}

#[tokio::test]
async fn test_close_persists_config() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    workspace.toggle_folder(Path::new("/ws/docs")).await.unwrap();
    workspace.close().await;

    assert!(workspace.root().is_none());
    let saved = fs.content("/ws/.mdeditor.json").unwrap();
    assert!(saved.contains("/ws/docs"));
}

#[tokio::test]
async fn test_create_file_through_inline_edit() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    workspace
        .start_creating_file(Path::new("/ws/docs"))
        .await
        .unwrap();
    assert!(workspace.state().is_expanded(Path::new("/ws/docs")));

    let path = workspace.confirm_editing("note").await.unwrap();
    assert_eq!(path, p("/ws/docs/note.md"));
    assert!(fs.contains("/ws/docs/note.md"));
    assert!(workspace.state().editing().is_idle());
    assert_eq!(workspace.state().selection().path(), Some(path.as_path()));
    assert_eq!(workspace.current_file(), Some(path.as_path()));
    assert_eq!(workspace.document(), Some(""));
    assert!(row_paths(&workspace).contains(&path));
}

#[tokio::test]
async fn test_trailing_slash_creates_folder() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    workspace.start_creating_file(Path::new("/ws")).await.unwrap();
    let path = workspace.confirm_editing("drafts/").await.unwrap();

    assert_eq!(path, p("/ws/drafts"));
    assert!(fs.is_dir("/ws/drafts"));
    assert!(row_paths(&workspace).contains(&path));
}

#[tokio::test]
async fn test_invalid_name_keeps_editing() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    workspace.start_creating_file(Path::new("/ws")).await.unwrap();
    let err = workspace.confirm_editing("a:b").await;

    assert!(matches!(
        err,
        Err(WorkspaceError::Validation(NameError::InvalidCharacters))
    ));
    assert!(!workspace.state().editing().is_idle());
    assert!(workspace.notifications().is_empty());
    assert!(fs.calls_of(FsOp::CreateFile).is_empty());
}

#[tokio::test]
async fn test_second_edit_is_rejected() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    workspace.start_creating_file(Path::new("/ws")).await.unwrap();
    let err = workspace.start_renaming(Path::new("/ws/readme.md"));
    assert!(matches!(err, Err(WorkspaceError::EditingInProgress)));
    assert!(workspace.cancel_editing());
    assert!(matches!(
        workspace.confirm_editing("x").await,
        Err(WorkspaceError::NotEditing)
    ));
}

#[tokio::test]
async fn test_create_conflict_is_notified() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    workspace.start_creating_file(Path::new("/ws")).await.unwrap();
    let err = workspace.confirm_editing("readme").await;

    assert!(matches!(err, Err(WorkspaceError::Conflict(_))));
    assert!(workspace.state().editing().is_idle());
    assert_eq!(
        workspace.notifications().last().map(|n| n.message.as_str()),
        Some("An item named \"readme.md\" already exists")
    );
    assert_eq!(fs.content("/ws/readme.md").as_deref(), Some("R"));
}

#[tokio::test]
async fn test_rename_folder_keeps_open_file_without_reread() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    workspace.toggle_folder(Path::new("/ws/docs")).await.unwrap();
    workspace
        .select(Path::new("/ws/docs/a.md"), false)
        .await
        .unwrap();
    fs.clear_calls();

    let renamed = workspace.rename(Path::new("/ws/docs"), "notes").await.unwrap();

    assert_eq!(renamed, p("/ws/notes"));
    assert_eq!(workspace.current_file(), Some(Path::new("/ws/notes/a.md")));
    assert_eq!(workspace.document(), Some("A"));
    assert!(fs.calls_of(FsOp::Read).is_empty());
    assert!(workspace.state().is_expanded(Path::new("/ws/notes")));
    assert!(row_paths(&workspace).contains(&p("/ws/notes/a.md")));
    assert!(!row_paths(&workspace).contains(&p("/ws/docs")));
}

#[tokio::test]
async fn test_rename_to_same_name_is_noop() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    workspace.start_renaming(Path::new("/ws/readme.md")).unwrap();
    let path = workspace.confirm_editing(" readme.md ").await.unwrap();

    assert_eq!(path, p("/ws/readme.md"));
    assert!(fs.calls_of(FsOp::Rename).is_empty());
    assert!(workspace.state().editing().is_idle());
}

#[tokio::test]
async fn test_delete_open_file_clears_document_and_selection() {
    let fs = fixture();
    let editor = RecordingEditor::default();
    let mut workspace = opened(&fs).await;
    workspace.attach_editor(Box::new(editor.clone()));
    workspace
        .select(Path::new("/ws/readme.md"), false)
        .await
        .unwrap();

    workspace.delete(Path::new("/ws/readme.md")).await.unwrap();

    assert!(workspace.current_file().is_none());
    assert!(workspace.document().is_none());
    assert!(workspace.state().selection().path().is_none());
    assert_eq!(editor.last().as_deref(), Some(""));
    assert_eq!(row_paths(&workspace), vec![p("/ws/docs")]);

    // Navigation starts over from the first row.
    assert!(workspace.navigate(Direction::Down));
    assert_eq!(
        workspace.state().selection().path(),
        Some(Path::new("/ws/docs"))
    );
}

#[tokio::test]
async fn test_delete_failure_keeps_tree() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    fs.fail(FsOp::Delete, None);

    let err = workspace.delete(Path::new("/ws/readme.md")).await;

    assert!(matches!(err, Err(WorkspaceError::Adapter { .. })));
    assert!(row_paths(&workspace).contains(&p("/ws/readme.md")));
    assert_eq!(workspace.notifications().items().len(), 1);
}

#[tokio::test]
async fn test_drag_moves_file_into_folder() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    workspace.start_drag(Path::new("/ws/readme.md"), false);
    assert!(workspace.drag_over(Some((Path::new("/ws/docs"), true))));
    let moved = workspace.end_drag().await.unwrap();

    assert_eq!(moved, Some(p("/ws/docs/readme.md")));
    assert!(fs.contains("/ws/docs/readme.md"));
    assert!(!fs.contains("/ws/readme.md"));
    assert!(workspace.state().is_expanded(Path::new("/ws/docs")));
    assert!(row_paths(&workspace).contains(&p("/ws/docs/readme.md")));
    assert!(!workspace.state().drag().is_active());
}

#[tokio::test]
async fn test_drop_on_same_parent_does_nothing() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    workspace.start_drag(Path::new("/ws/readme.md"), false);
    workspace.drag_over(Some((Path::new("/ws"), true)));
    assert_eq!(workspace.end_drag().await.unwrap(), None);
    assert!(fs.calls_of(FsOp::Rename).is_empty());
    assert!(!workspace.state().drag().is_active());
}

#[tokio::test]
async fn test_move_into_descendant_is_rejected() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    workspace.toggle_folder(Path::new("/ws/docs")).await.unwrap();

    let err = workspace
        .move_item(Path::new("/ws/docs"), Path::new("/ws/docs/sub"))
        .await;

    assert!(matches!(
        err,
        Err(WorkspaceError::InvalidMove(DropRejection::IntoDescendant))
    ));
    assert!(fs.calls_of(FsOp::Rename).is_empty());
    assert!(workspace.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_switching_files_flushes_pending_save() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    workspace.toggle_folder(Path::new("/ws/docs")).await.unwrap();
    workspace
        .select(Path::new("/ws/docs/a.md"), false)
        .await
        .unwrap();

    workspace.content_changed("edited");
    workspace
        .select(Path::new("/ws/readme.md"), false)
        .await
        .unwrap();

    assert_eq!(fs.content("/ws/docs/a.md").as_deref(), Some("edited"));
    assert_eq!(workspace.document(), Some("R"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_flush_blocks_switch() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    workspace
        .select(Path::new("/ws/readme.md"), false)
        .await
        .unwrap();
    fs.fail(FsOp::Write, None);

    workspace.content_changed("unsaved");
    workspace.toggle_folder(Path::new("/ws/docs")).await.unwrap();
    let err = workspace.open_file(Path::new("/ws/docs/a.md")).await;

    assert!(matches!(err, Err(WorkspaceError::Adapter { op: "save", .. })));
    assert_eq!(workspace.current_file(), Some(Path::new("/ws/readme.md")));
    assert_eq!(workspace.document(), Some("unsaved"));
}

#[tokio::test(start_paused = true)]
async fn test_background_save_failure_becomes_notification() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    workspace
        .select(Path::new("/ws/readme.md"), false)
        .await
        .unwrap();
    fs.fail(FsOp::Write, None);

    workspace.content_changed("lost");
    tokio::time::sleep(Duration::from_secs(1)).await;
    workspace.poll_background();

    assert_eq!(
        workspace.notifications().last().map(|n| n.kind),
        Some(NotificationKind::Error)
    );
}

#[tokio::test]
async fn test_save_writes_document() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    assert!(!workspace.save().await.unwrap());

    workspace
        .select(Path::new("/ws/readme.md"), false)
        .await
        .unwrap();
    workspace.content_changed("# Readme");
    assert!(workspace.save().await.unwrap());
    assert_eq!(fs.content("/ws/readme.md").as_deref(), Some("# Readme"));
}

#[tokio::test]
async fn test_sidebar_keys() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    assert!(workspace.handle_sidebar_key(SidebarKey::Down).await.unwrap());
    assert!(workspace.handle_sidebar_key(SidebarKey::Right).await.unwrap());
    assert!(workspace.state().is_expanded(Path::new("/ws/docs")));
    assert!(workspace.handle_sidebar_key(SidebarKey::Left).await.unwrap());
    assert!(!workspace.state().is_expanded(Path::new("/ws/docs")));

    workspace.handle_sidebar_key(SidebarKey::Down).await.unwrap();
    assert!(workspace.handle_sidebar_key(SidebarKey::Enter).await.unwrap());
    assert_eq!(workspace.current_file(), Some(Path::new("/ws/readme.md")));

    workspace.start_creating_file(Path::new("/ws")).await.unwrap();
    assert!(!workspace.handle_sidebar_key(SidebarKey::Up).await.unwrap());
}

#[tokio::test]
async fn test_toggle_dotfiles_relists() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    assert!(workspace.toggle_dotfiles().await.unwrap());
    assert!(row_paths(&workspace).contains(&p("/ws/.hidden.md")));
    assert!(fs.content("/ws/.mdeditor.json").is_some());

    assert!(!workspace.toggle_dotfiles().await.unwrap());
    assert!(!row_paths(&workspace).contains(&p("/ws/.hidden.md")));
}

#[tokio::test]
async fn test_quick_find_matches_loaded_files() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    workspace.toggle_folder(Path::new("/ws/docs")).await.unwrap();

    assert_eq!(workspace.quick_find("READ"), vec![p("/ws/readme.md")]);
    assert_eq!(workspace.quick_find("").len(), 2);
    assert!(workspace.quick_find("zzz").is_empty());
}

#[tokio::test]
async fn test_actions_need_an_open_workspace() {
    let fs = fixture();
    let mut workspace = Workspace::new(fs.clone());

    assert!(matches!(
        workspace.create_file(Path::new("/ws"), "x").await,
        Err(WorkspaceError::NoWorkspace)
    ));
    assert!(matches!(
        workspace.reload_root().await,
        Err(WorkspaceError::NoWorkspace)
    ));
    assert!(workspace.notifications().is_empty());
}

#[tokio::test]
async fn test_new_entries_land_in_current_directory() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;

    workspace.new_folder_here().await.unwrap();
    assert_eq!(
        workspace.state().editing(),
        &EditingState::creating_folder("/ws")
    );
    workspace.cancel_editing();

    workspace.toggle_folder(Path::new("/ws/docs")).await.unwrap();
    workspace
        .select(Path::new("/ws/docs/a.md"), false)
        .await
        .unwrap();
    workspace.new_file_here().await.unwrap();
    assert_eq!(
        workspace.state().editing(),
        &EditingState::creating_file("/ws/docs")
    );
}

#[tokio::test]
async fn test_config_save_failure_keeps_setting() {
    let fs = fixture();
    let mut workspace = opened(&fs).await;
    fs.fail(FsOp::Write, Some(Path::new("/ws/.mdeditor.json")));

    assert!(workspace.set_preview_enabled(true).await.unwrap());
    assert!(workspace.state().config().preview_enabled);
    assert_eq!(workspace.notifications().items().len(), 1);
    assert!(fs.content("/ws/.mdeditor.json").is_none());
}

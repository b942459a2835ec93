use super::*;
use crate::kernel::services::adapters::file::{FsOp, MemoryFs};

#[tokio::test]
async fn test_missing_config_yields_defaults() {
    let fs = MemoryFs::new().with_dir("/ws");
    let config = load_workspace_config(&fs, Path::new("/ws")).await;
    assert_eq!(config, WorkspaceConfig::default());
    assert!(fs.calls_of(FsOp::Read).is_empty());
}

#[tokio::test]
async fn test_malformed_config_yields_defaults() {
    let fs = MemoryFs::new().with_file("/ws/.mdeditor.json", "{ nope");
    let config = load_workspace_config(&fs, Path::new("/ws")).await;
    assert_eq!(config, WorkspaceConfig::default());
}

#[tokio::test]
async fn test_unreadable_config_yields_defaults() {
    let fs = MemoryFs::new().with_file("/ws/.mdeditor.json", r#"{ "showDotfiles": true }"#);
    fs.fail(FsOp::Read, None);
    let config = load_workspace_config(&fs, Path::new("/ws")).await;
    assert_eq!(config, WorkspaceConfig::default());
}

#[tokio::test]
async fn test_save_then_load() {
    let fs = MemoryFs::new().with_dir("/ws");
    let mut config = WorkspaceConfig::default();
    config.show_dotfiles = true;
    config.expanded_folders.push(PathBuf::from("/ws/docs"));

    save_workspace_config(&fs, Path::new("/ws"), &config)
        .await
        .unwrap();
    assert!(fs.contains("/ws/.mdeditor.json"));
    assert_eq!(load_workspace_config(&fs, Path::new("/ws")).await, config);
}

use super::*;

fn sample() -> MemoryFs {
    MemoryFs::new()
        .with_dir("/ws")
        .with_file("/ws/readme.md", "# hi")
        .with_file("/ws/docs/a.md", "a")
        .with_file("/ws/docs/deep/b.md", "b")
        .with_file("/ws/image.png", "")
}

#[tokio::test]
async fn test_list_directory() {
    let fs = sample();
    let entries = fs
        .list_directory(Path::new("/ws"), ListOptions::default())
        .await
        .unwrap();
    assert_eq!(
        entries,
        vec![DirEntryInfo::dir("docs"), DirEntryInfo::file("readme.md")]
    );
}

#[tokio::test]
async fn test_list_errors() {
    let fs = sample();
    let err = fs
        .list_directory(Path::new("/nope"), ListOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));

    let err = fs
        .list_directory(Path::new("/ws/readme.md"), ListOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FsError::NotADirectory(_)));
}

#[tokio::test]
async fn test_create_file_and_conflict() {
    let fs = sample();
    fs.create_file(Path::new("/ws/new.md")).await.unwrap();
    assert_eq!(fs.content("/ws/new.md").as_deref(), Some(""));

    let err = fs.create_file(Path::new("/ws/new.md")).await.unwrap_err();
    assert!(matches!(err, FsError::AlreadyExists(_)));

    let err = fs
        .create_file(Path::new("/ws/missing/x.md"))
        .await
        .unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
}

#[tokio::test]
async fn test_rename_moves_whole_subtree() {
    let fs = sample();
    fs.rename(Path::new("/ws/docs"), Path::new("/ws/notes"))
        .await
        .unwrap();

    assert!(!fs.contains("/ws/docs"));
    assert!(!fs.contains("/ws/docs/a.md"));
    assert_eq!(fs.content("/ws/notes/a.md").as_deref(), Some("a"));
    assert_eq!(fs.content("/ws/notes/deep/b.md").as_deref(), Some("b"));
}

#[tokio::test]
async fn test_rename_into_itself_is_rejected() {
    let fs = sample();
    let err = fs
        .rename(Path::new("/ws/docs"), Path::new("/ws/docs/deep/docs"))
        .await
        .unwrap_err();
    assert!(matches!(err, FsError::Io(_)));
    assert!(fs.contains("/ws/docs/a.md"));
}

#[tokio::test]
async fn test_similar_prefix_is_not_a_descendant() {
    let fs = sample().with_file("/ws/docs2/c.md", "c");
    fs.delete_recursive(Path::new("/ws/docs")).await.unwrap();

    assert!(!fs.contains("/ws/docs/deep/b.md"));
    assert!(fs.contains("/ws/docs2/c.md"));
}

#[tokio::test]
async fn test_injected_failures_and_call_log() {
    let fs = sample();
    fs.fail(FsOp::Write, Some(Path::new("/ws/readme.md")));

    let err = fs
        .write_file(Path::new("/ws/readme.md"), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, FsError::PermissionDenied(_)));
    assert_eq!(fs.content("/ws/readme.md").as_deref(), Some("# hi"));

    fs.write_file(Path::new("/ws/docs/a.md"), "x").await.unwrap();
    assert_eq!(
        fs.calls_of(FsOp::Write),
        vec![PathBuf::from("/ws/readme.md"), PathBuf::from("/ws/docs/a.md")]
    );

    fs.clear_failures();
    fs.write_file(Path::new("/ws/readme.md"), "x").await.unwrap();
    assert_eq!(fs.content("/ws/readme.md").as_deref(), Some("x"));
}

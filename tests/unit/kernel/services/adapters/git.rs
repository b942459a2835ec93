use super::*;
use crate::kernel::services::ports::shell::CommandError;
use tempfile::tempdir;

#[test]
fn test_parse_status_porcelain() {
    let text = " M notes/a.md\n?? new.md\nR  old.md -> renamed.md\nA  \"with space.md\"\n";
    assert_eq!(
        parse_status_porcelain(text),
        vec![
            PathBuf::from("notes/a.md"),
            PathBuf::from("new.md"),
            PathBuf::from("renamed.md"),
            PathBuf::from("with space.md"),
        ]
    );
}

#[test]
fn test_parse_clean_status() {
    assert!(parse_status_porcelain("").is_empty());
    assert!(parse_status_porcelain("\n").is_empty());
}

#[tokio::test]
async fn test_missing_executable_is_a_spawn_error() {
    let dir = tempdir().unwrap();
    let git = ProcessGit::with_program("mdspace-no-such-git-binary");

    let err = git.status_porcelain(dir.path()).await.unwrap_err();
    assert!(matches!(err, CommandError::Spawn { .. }));
}

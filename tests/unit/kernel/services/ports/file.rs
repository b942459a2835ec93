use super::*;

fn names(entries: &[DirEntryInfo]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn listing_puts_directories_first_then_case_sensitive_names() {
    let entries = vec![
        DirEntryInfo::file("z.md"),
        DirEntryInfo::dir("B"),
        DirEntryInfo::file("a.md"),
        DirEntryInfo::dir("A"),
        DirEntryInfo::file("Zeta.md"),
    ];

    let sorted = filter_and_sort(entries, ListOptions::default());
    assert_eq!(names(&sorted), vec!["A", "B", "Zeta.md", "a.md", "z.md"]);
}

#[test]
fn listing_keeps_only_markdown_files() {
    let entries = vec![
        DirEntryInfo::file("notes.md"),
        DirEntryInfo::file("image.png"),
        DirEntryInfo::file("readme.markdown"),
        DirEntryInfo::dir("assets"),
    ];

    let sorted = filter_and_sort(entries, ListOptions::default());
    assert_eq!(names(&sorted), vec!["assets", "notes.md"]);
}

#[test]
fn dotfiles_follow_the_visibility_option() {
    let entries = || {
        vec![
            DirEntryInfo::file(".env"),
            DirEntryInfo::dir(".obsidian"),
            DirEntryInfo::file("a.md"),
        ]
    };

    let hidden = filter_and_sort(entries(), ListOptions::default());
    assert_eq!(names(&hidden), vec!["a.md"]);

    let shown = filter_and_sort(
        entries(),
        ListOptions {
            show_dotfiles: true,
        },
    );
    assert_eq!(names(&shown), vec![".obsidian", ".env", "a.md"]);
}

#[test]
fn reserved_entries_are_always_hidden() {
    let entries = vec![
        DirEntryInfo::dir(".git"),
        DirEntryInfo::file(WORKSPACE_CONFIG_FILE),
        DirEntryInfo::file(".keep"),
    ];

    let shown = filter_and_sort(
        entries,
        ListOptions {
            show_dotfiles: true,
        },
    );
    assert_eq!(names(&shown), vec![".keep"]);
}

#[test]
fn io_errors_map_to_path_aware_variants() {
    let path = Path::new("/ws/a.md");
    let err = FsError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
    assert!(matches!(err, FsError::NotFound(p) if p == path));

    let err = FsError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
    assert!(matches!(err, FsError::PermissionDenied(_)));

    let err = FsError::from_io(path, io::Error::other("boom"));
    assert!(matches!(err, FsError::Io(_)));
}

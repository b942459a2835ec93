use super::*;

#[test]
fn test_default_config() {
    let config = WorkspaceConfig::default();
    assert_eq!(config.version, "1.0.0");
    assert_eq!(config.sidebar_width, 250);
    assert!(!config.preview_enabled);
    assert!(!config.show_dotfiles);
    assert!(config.expanded_folders.is_empty());
    assert!(config.last_opened_file.is_none());
}

#[test]
fn missing_fields_take_defaults() {
    let config = WorkspaceConfig::from_json(r#"{ "showDotfiles": true }"#).unwrap();
    assert!(config.show_dotfiles);
    assert_eq!(config.sidebar_width, 250);
    assert_eq!(config.version, "1.0.0");
}

#[test]
fn unknown_fields_are_ignored() {
    let config =
        WorkspaceConfig::from_json(r#"{ "sidebarWidth": 320, "editorWidth": "prose" }"#).unwrap();
    assert_eq!(config.sidebar_width, 320);
}

#[test]
fn invalid_json_is_rejected() {
    assert!(WorkspaceConfig::from_json("{ not json").is_none());
}

#[test]
fn config_round_trips_through_camel_case_json() {
    let mut config = WorkspaceConfig::default();
    config.expanded_folders.push(PathBuf::from("/ws/docs"));
    config.last_opened_file = Some(PathBuf::from("/ws/readme.md"));

    let json = config.to_json();
    assert!(json.contains("\"expandedFolders\""));
    assert!(json.contains("\"lastOpenedFile\""));
    assert_eq!(WorkspaceConfig::from_json(&json), Some(config));
}

#[test]
fn last_opened_file_is_omitted_when_absent() {
    let json = WorkspaceConfig::default().to_json();
    assert!(!json.contains("lastOpenedFile"));
}

#[test]
fn toggling_twice_restores_the_expansion_set() {
    let mut config = WorkspaceConfig::default();
    config.expand(Path::new("/ws/a"));
    config.expand(Path::new("/ws/b"));
    let before: std::collections::HashSet<_> = config.expanded_folders.iter().cloned().collect();

    for path in ["/ws/a", "/ws/c", "/ws/b"] {
        config.toggle_expanded(Path::new(path));
        config.toggle_expanded(Path::new(path));
        let after: std::collections::HashSet<_> =
            config.expanded_folders.iter().cloned().collect();
        assert_eq!(after, before);
    }
}

#[test]
fn sidebar_width_is_clamped() {
    let mut config = WorkspaceConfig::default();
    assert_eq!(config.set_sidebar_width(40), 150);
    assert_eq!(config.set_sidebar_width(900), 500);
    assert_eq!(config.set_sidebar_width(300), 300);
}

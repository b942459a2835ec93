//! Service ports: traits + data contracts.

pub mod config;
pub mod editor;
pub mod file;
pub mod settings;
pub mod shell;

pub use config::WorkspaceConfig;
pub use editor::EditorSurface;
pub use file::{
    filter_and_sort, DirEntryInfo, FsAdapter, FsError, ListOptions, Result as FsResult,
    MARKDOWN_EXTENSION, WORKSPACE_CONFIG_FILE,
};
pub use settings::AppSettings;
pub use shell::{CommandError, CommandResult, GitPort, InputPrompt, ShellPort};

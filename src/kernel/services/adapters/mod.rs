//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod config;
pub mod dirs;
pub mod file;
pub mod git;
mod process;
pub mod session;
pub mod settings;
pub mod shell;

pub use config::{load_workspace_config, save_workspace_config, workspace_config_path};
pub use dirs::{ensure_log_dir, get_app_data_dir, get_config_dir, get_log_dir};
pub use file::{LocalFs, MemoryFs};
pub use git::ProcessGit;
pub use session::{Session, SessionStore};
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, load_settings_from, save_settings_to,
};
pub use shell::ProcessShell;

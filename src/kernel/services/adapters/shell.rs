use super::process::spawn_detached;
use crate::kernel::services::ports::shell::{CommandResult, ShellPort};
use async_trait::async_trait;
use std::path::Path;

/// `ShellPort` that launches the platform's terminal and file manager.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessShell;

impl ProcessShell {
    pub fn new() -> Self {
        Self
    }
}

fn cwd_for(path: &Path) -> &Path {
    if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    }
}

#[async_trait]
impl ShellPort for ProcessShell {
    async fn open_terminal(&self, dir: &Path) -> CommandResult<()> {
        let dir_arg = dir.to_string_lossy();

        #[cfg(target_os = "macos")]
        {
            return spawn_detached("open", &["-a", "Terminal", &dir_arg], dir);
        }

        #[cfg(target_os = "linux")]
        {
            let _ = &dir_arg;
            return spawn_detached("x-terminal-emulator", &[], dir);
        }

        #[cfg(target_os = "windows")]
        {
            let _ = &dir_arg;
            return spawn_detached("cmd", &["/C", "start", "cmd"], dir);
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            let _ = &dir_arg;
            Err(crate::kernel::services::ports::shell::CommandError::Unsupported)
        }
    }

    async fn open_file_manager(&self, path: &Path) -> CommandResult<()> {
        let path_arg = path.to_string_lossy();
        let cwd = cwd_for(path);

        #[cfg(target_os = "macos")]
        {
            return spawn_detached("open", &[&path_arg], cwd);
        }

        #[cfg(target_os = "linux")]
        {
            return spawn_detached("xdg-open", &[&path_arg], cwd);
        }

        #[cfg(target_os = "windows")]
        {
            return spawn_detached("explorer", &[&path_arg], cwd);
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            let _ = (&path_arg, cwd);
            Err(crate::kernel::services::ports::shell::CommandError::Unsupported)
        }
    }
}

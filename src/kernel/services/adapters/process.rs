use crate::kernel::services::ports::shell::{CommandError, CommandResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Runs `program` to completion in `cwd` and returns its stdout.
pub(crate) async fn run(program: &str, args: &[&str], cwd: &Path) -> CommandResult<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| CommandError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(program, ?args, code = ?output.status.code(), %stderr, "command failed");
        return Err(CommandError::Failed {
            program: program.to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Starts `program` without waiting for it to exit.
pub(crate) fn spawn_detached(program: &str, args: &[&str], cwd: &Path) -> CommandResult<()> {
    Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|source| CommandError::Spawn {
            program: program.to_string(),
            source,
        })
}

use super::process::run;
use crate::kernel::services::ports::shell::{CommandResult, GitPort};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// `GitPort` backed by the `git` executable on `PATH`.
#[derive(Debug, Clone)]
pub struct ProcessGit {
    program: String,
}

impl ProcessGit {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ProcessGit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitPort for ProcessGit {
    async fn status_porcelain(&self, root: &Path) -> CommandResult<String> {
        run(&self.program, &["status", "--porcelain"], root).await
    }

    async fn add_all(&self, root: &Path) -> CommandResult<()> {
        run(&self.program, &["add", "-A"], root).await.map(|_| ())
    }

    async fn commit(&self, root: &Path, message: &str) -> CommandResult<()> {
        run(&self.program, &["commit", "-m", message], root)
            .await
            .map(|_| ())
    }

    async fn push(&self, root: &Path) -> CommandResult<()> {
        run(&self.program, &["push"], root).await.map(|_| ())
    }
}

/// Paths named by `git status --porcelain` output, relative to the repo root.
pub fn parse_status_porcelain(text: &str) -> Vec<PathBuf> {
    text.lines()
        .filter_map(|line| line.get(3..))
        .filter(|path| !path.is_empty())
        .map(|path| {
            // Renames are reported as "old -> new".
            let path = path.rsplit(" -> ").next().unwrap_or(path);
            PathBuf::from(path.trim_matches('"'))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/git.rs"]
mod tests;

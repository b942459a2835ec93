//! Loads and stores the per-workspace config file through the file adapter.

use crate::kernel::services::ports::config::WorkspaceConfig;
use crate::kernel::services::ports::file::{FsAdapter, Result, WORKSPACE_CONFIG_FILE};
use std::path::{Path, PathBuf};

pub fn workspace_config_path(root: &Path) -> PathBuf {
    root.join(WORKSPACE_CONFIG_FILE)
}

/// Never fails: a missing, unreadable or malformed file yields the defaults.
pub async fn load_workspace_config(fs: &dyn FsAdapter, root: &Path) -> WorkspaceConfig {
    let path = workspace_config_path(root);
    match fs.exists(&path).await {
        Ok(false) => return WorkspaceConfig::default(),
        Ok(true) => {}
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot stat workspace config");
        }
    }

    let text = match fs.read_file(&path).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read workspace config");
            return WorkspaceConfig::default();
        }
    };

    WorkspaceConfig::from_json(&text).unwrap_or_else(|| {
        tracing::warn!(path = %path.display(), "malformed workspace config, using defaults");
        WorkspaceConfig::default()
    })
}

pub async fn save_workspace_config(
    fs: &dyn FsAdapter,
    root: &Path,
    config: &WorkspaceConfig,
) -> Result<()> {
    let path = workspace_config_path(root);
    fs.write_file(&path, &config.to_json()).await?;
    tracing::debug!(path = %path.display(), "workspace config saved");
    Ok(())
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/config.rs"]
mod tests;

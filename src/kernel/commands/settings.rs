use super::CommandHost;
use crate::kernel::services::adapters::settings::{ensure_settings_file_at, load_settings_from};
use crate::kernel::services::ports::settings::AppSettings;
use crate::kernel::workspace::Workspace;

/// Creates the settings file with defaults if needed and opens it in the
/// editor.
pub(super) async fn open_settings(host: &CommandHost, workspace: &mut Workspace) {
    let Some(path) = host.settings_path.clone() else {
        workspace
            .notifications_mut()
            .error("Failed to open settings: Cannot determine settings directory");
        return;
    };

    if let Err(err) = ensure_settings_file_at(&path) {
        tracing::warn!(path = %path.display(), error = %err, "cannot create settings file");
        workspace
            .notifications_mut()
            .error(format!("Failed to open settings: {err}"));
        return;
    }

    // Read failures are already reported by the workspace.
    if workspace.open_file(&path).await.is_ok() {
        workspace.notifications_mut().success("Opened settings file");
    }
}

pub(super) fn reload_settings(host: &mut CommandHost, workspace: &mut Workspace) {
    let settings = match host.settings_path.as_deref() {
        Some(path) => load_settings_from(path),
        None => AppSettings::default(),
    };
    host.apply_settings(settings);
    workspace.notifications_mut().success("Settings reloaded");
}

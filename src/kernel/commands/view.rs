use super::CommandHost;
use crate::kernel::services::adapters::settings::save_settings_to;
use crate::kernel::workspace::Workspace;

pub(super) async fn toggle_dotfiles(workspace: &mut Workspace) {
    match workspace.toggle_dotfiles().await {
        Ok(true) => {
            workspace.notifications_mut().info("Dotfiles are now visible");
        }
        Ok(false) => {
            workspace.notifications_mut().info("Dotfiles are now hidden");
        }
        Err(err) => tracing::warn!(error = %err, "toggle dotfiles failed"),
    }
}

/// Flips to the opposite of the shown theme and persists the preference.
pub(super) fn toggle_theme(host: &mut CommandHost, workspace: &mut Workspace) {
    let theme = host.theme.toggle();
    host.settings.theme = host.theme.preference;

    if let Some(path) = host.settings_path.as_deref() {
        if let Err(err) = save_settings_to(path, &host.settings) {
            tracing::warn!(path = %path.display(), error = %err, "failed to persist theme");
        }
    }

    workspace
        .notifications_mut()
        .info(format!("Switched to {} mode", theme.as_str()));
}

pub(super) async fn toggle_preview(workspace: &mut Workspace) {
    match workspace.toggle_preview().await {
        Ok(true) => {
            workspace.notifications_mut().info("Markdown preview shown");
        }
        Ok(false) => {
            workspace.notifications_mut().info("Markdown preview hidden");
        }
        Err(err) => tracing::warn!(error = %err, "toggle preview failed"),
    }
}

use super::CommandHost;
use crate::kernel::workspace::Workspace;

pub(super) async fn open_terminal(host: &CommandHost, workspace: &mut Workspace) {
    let Some(dir) = workspace.state().current_directory() else {
        workspace.notifications_mut().error("No directory to open");
        return;
    };

    let message = match host.shell.open_terminal(&dir).await {
        Ok(()) => Ok(format!("Opened Terminal at {}", dir.display())),
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "open terminal failed");
            Err(format!("Failed to open Terminal: {err}"))
        }
    };
    notify(workspace, message);
}

pub(super) async fn open_file_manager(host: &CommandHost, workspace: &mut Workspace) {
    let Some(dir) = workspace.state().current_directory() else {
        workspace.notifications_mut().error("No directory to open");
        return;
    };

    let message = match host.shell.open_file_manager(&dir).await {
        Ok(()) => Ok(format!("Opened file manager at {}", dir.display())),
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "open file manager failed");
            Err(format!("Failed to open file manager: {err}"))
        }
    };
    notify(workspace, message);
}

fn notify(workspace: &mut Workspace, message: Result<String, String>) {
    let notifications = workspace.notifications_mut();
    match message {
        Ok(text) => notifications.success(text),
        Err(text) => notifications.error(text),
    };
}

use super::CommandHost;
use crate::kernel::services::adapters::git::parse_status_porcelain;
use crate::kernel::workspace::Workspace;
use std::path::Path;

pub const COMMIT_PROMPT_TITLE: &str = "Commit Message";
pub const COMMIT_PROMPT_PLACEHOLDER: &str = "Enter commit message...";

/// status, prompt, `add -A`, commit, push. Stops at the first failing step.
pub(super) async fn commit_all_and_push(host: &CommandHost, workspace: &mut Workspace) {
    let Some(root) = workspace.root().map(Path::to_path_buf) else {
        workspace.notifications_mut().error("No workspace open");
        return;
    };

    // Unsaved edits belong in the commit.
    if workspace.flush_autosave().await.is_err() {
        return;
    }

    let status = match host.git.status_porcelain(&root).await {
        Ok(status) => status,
        Err(err) => {
            workspace
                .notifications_mut()
                .error(format!("Git error: {err}"));
            return;
        }
    };
    let changed = parse_status_porcelain(&status);
    if changed.is_empty() {
        workspace.notifications_mut().info("No changes to commit");
        return;
    }

    let message = host
        .prompt
        .request_line(COMMIT_PROMPT_TITLE, COMMIT_PROMPT_PLACEHOLDER)
        .await
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty());
    let Some(message) = message else {
        tracing::debug!("commit cancelled");
        return;
    };

    if let Err(err) = host.git.add_all(&root).await {
        workspace
            .notifications_mut()
            .error(format!("Failed to stage changes: {err}"));
        return;
    }
    if let Err(err) = host.git.commit(&root, &message).await {
        workspace
            .notifications_mut()
            .error(format!("Commit failed: {err}"));
        return;
    }
    if let Err(err) = host.git.push(&root).await {
        workspace
            .notifications_mut()
            .error(format!("Push failed: {err}"));
        return;
    }

    tracing::info!(root = %root.display(), files = changed.len(), "committed and pushed");
    workspace
        .notifications_mut()
        .success("Changes committed and pushed successfully");
}

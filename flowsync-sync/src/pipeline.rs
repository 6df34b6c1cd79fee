//! One reconciliation run: Fetch → Normalize → Reconcile → Classify.

use std::path::Path;

use flowsync_core::{LocalProject, ReconciliationResult, Reference, RepoId};
use flowsync_remote::{fetch, TreeTransport};

use crate::delivery::Delivery;
use crate::error::SyncError;
use crate::reconcile::reconcile_all;

/// Reconcile `project` against `reference.commit` of `repo`.
///
/// All or nothing: any fetch failure aborts the run.
pub async fn run<T: TreeTransport>(
    transport: &T,
    repo: &RepoId,
    reference: &Reference,
    project: &LocalProject,
) -> Result<Delivery, SyncError> {
    let objects = fetch(transport, repo, &reference.commit).await?;
    let ops = reconcile_all(project, &objects);

    let result = ReconciliationResult {
        repo: repo.clone(),
        reference: reference.name.clone(),
        commit: reference.commit.clone(),
        tree: objects.tree,
        pull: ops.pull,
        push: ops.push,
        conflict: ops.conflict,
    };
    let delivery = Delivery::from(result);

    let result = delivery.result();
    tracing::info!(
        %repo,
        commit = %reference.commit,
        pull = result.pull.len(),
        push = result.push.len(),
        conflict = result.conflict.len(),
        outcome = %delivery.outcome(),
        "reconciled"
    );
    Ok(delivery)
}

/// Scan the working directory at `root`, then [`run`] against it.
pub async fn run_dir<T: TreeTransport>(
    transport: &T,
    repo: &RepoId,
    reference: &Reference,
    root: &Path,
) -> Result<Delivery, SyncError> {
    let mut project = flowsync_local::scan(root)?;
    project.repo = Some(repo.clone());
    run(transport, repo, reference, &project).await
}

//! Action classifier: one [`Outcome`] per reconciliation result.
//!
//! Checks run in order and the first hit wins:
//! 1. any conflict → `Mixed`
//! 2. pushes and pulls → `Mixed`
//! 3. pushes only → `LocalAhead`
//! 4. pulls only → `RemoteAhead`
//! 5. nothing → `NoOp`

use flowsync_core::{Outcome, ReconciliationResult};

pub fn classify(result: &ReconciliationResult) -> Outcome {
    let push = !result.push.is_empty();
    let pull = !result.pull.is_empty();
    if !result.conflict.is_empty() || (push && pull) {
        Outcome::Mixed
    } else if push {
        Outcome::LocalAhead
    } else if pull {
        Outcome::RemoteAhead
    } else {
        Outcome::NoOp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsync_core::{
        ArtifactKind, ArtifactPair, CommitSha, LocalArtifact, RepoId, SyncAction, SyncOperation,
        TreeSha,
    };
    use rstest::rstest;

    fn op(action: SyncAction) -> SyncOperation {
        SyncOperation {
            action,
            kind: ArtifactKind::Component,
            path: "components/add.js".to_string(),
            artifacts: ArtifactPair::Local(LocalArtifact::new(ArtifactKind::Component, "add")),
        }
    }

    fn result(pull: usize, push: usize, conflict: usize) -> ReconciliationResult {
        ReconciliationResult {
            repo: RepoId::from("noflo/example"),
            reference: None,
            commit: CommitSha::from("c1"),
            tree: TreeSha::from("t1"),
            pull: (0..pull).map(|_| op(SyncAction::Pull)).collect(),
            push: (0..push).map(|_| op(SyncAction::Push)).collect(),
            conflict: (0..conflict).map(|_| op(SyncAction::Conflict)).collect(),
        }
    }

    #[rstest]
    #[case(0, 0, 0, Outcome::NoOp)]
    #[case(0, 2, 0, Outcome::LocalAhead)]
    #[case(3, 0, 0, Outcome::RemoteAhead)]
    #[case(1, 1, 0, Outcome::Mixed)]
    #[case(0, 0, 1, Outcome::Mixed)]
    #[case(1, 0, 1, Outcome::Mixed)]
    #[case(0, 1, 1, Outcome::Mixed)]
    #[case(2, 2, 2, Outcome::Mixed)]
    fn outcome_table(
        #[case] pull: usize,
        #[case] push: usize,
        #[case] conflict: usize,
        #[case] expected: Outcome,
    ) {
        assert_eq!(classify(&result(pull, push, conflict)), expected);
    }
}

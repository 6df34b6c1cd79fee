//! Route a reconciliation result to exactly one downstream channel.

use serde::Serialize;

use flowsync_core::{Outcome, ReconciliationResult};

use crate::classify::classify;

/// A classified result. Exactly one variant exists per run.
///
/// Serializes as `{"outcome": "<variant>", "result": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "result", rename_all = "snake_case")]
pub enum Delivery {
    NoOp(ReconciliationResult),
    LocalAhead(ReconciliationResult),
    RemoteAhead(ReconciliationResult),
    Mixed(ReconciliationResult),
}

/// Receiver for classified results, one method per channel.
pub trait OutcomeSink {
    fn no_op(&mut self, result: ReconciliationResult);
    fn local_ahead(&mut self, result: ReconciliationResult);
    fn remote_ahead(&mut self, result: ReconciliationResult);
    fn mixed(&mut self, result: ReconciliationResult);
}

impl From<ReconciliationResult> for Delivery {
    fn from(result: ReconciliationResult) -> Self {
        match classify(&result) {
            Outcome::NoOp => Delivery::NoOp(result),
            Outcome::LocalAhead => Delivery::LocalAhead(result),
            Outcome::RemoteAhead => Delivery::RemoteAhead(result),
            Outcome::Mixed => Delivery::Mixed(result),
        }
    }
}

impl Delivery {
    pub fn outcome(&self) -> Outcome {
        match self {
            Delivery::NoOp(_) => Outcome::NoOp,
            Delivery::LocalAhead(_) => Outcome::LocalAhead,
            Delivery::RemoteAhead(_) => Outcome::RemoteAhead,
            Delivery::Mixed(_) => Outcome::Mixed,
        }
    }

    pub fn result(&self) -> &ReconciliationResult {
        match self {
            Delivery::NoOp(result)
            | Delivery::LocalAhead(result)
            | Delivery::RemoteAhead(result)
            | Delivery::Mixed(result) => result,
        }
    }

    pub fn into_result(self) -> ReconciliationResult {
        match self {
            Delivery::NoOp(result)
            | Delivery::LocalAhead(result)
            | Delivery::RemoteAhead(result)
            | Delivery::Mixed(result) => result,
        }
    }

    /// Hand the result to the one sink method matching its outcome.
    pub fn deliver<S: OutcomeSink + ?Sized>(self, sink: &mut S) {
        match self {
            Delivery::NoOp(result) => sink.no_op(result),
            Delivery::LocalAhead(result) => sink.local_ahead(result),
            Delivery::RemoteAhead(result) => sink.remote_ahead(result),
            Delivery::Mixed(result) => sink.mixed(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsync_core::{
        ArtifactKind, ArtifactPair, CommitSha, RemoteArtifact, RepoId, SyncAction, SyncOperation,
        TreeSha,
    };

    #[derive(Default)]
    struct Channels {
        fired: Vec<&'static str>,
    }

    impl OutcomeSink for Channels {
        fn no_op(&mut self, _: ReconciliationResult) {
            self.fired.push("noop");
        }
        fn local_ahead(&mut self, _: ReconciliationResult) {
            self.fired.push("local");
        }
        fn remote_ahead(&mut self, _: ReconciliationResult) {
            self.fired.push("remote");
        }
        fn mixed(&mut self, _: ReconciliationResult) {
            self.fired.push("both");
        }
    }

    fn empty() -> ReconciliationResult {
        ReconciliationResult {
            repo: RepoId::from("noflo/example"),
            reference: Some("refs/heads/main".to_string()),
            commit: CommitSha::from("c1"),
            tree: TreeSha::from("t1"),
            pull: Vec::new(),
            push: Vec::new(),
            conflict: Vec::new(),
        }
    }

    fn pull_op() -> SyncOperation {
        SyncOperation {
            action: SyncAction::Pull,
            kind: ArtifactKind::Spec,
            path: "spec/add.yaml".to_string(),
            artifacts: ArtifactPair::Remote(RemoteArtifact {
                path: "add.yaml".to_string(),
                full_path: "spec/add.yaml".to_string(),
                content_hash: "y1".into(),
                kind: ArtifactKind::Spec,
                name: "add".to_string(),
                language: "yaml".to_string(),
            }),
        }
    }

    #[test]
    fn exactly_one_channel_fires() {
        let mut remote = empty();
        remote.pull.push(pull_op());

        for (result, expected) in [(empty(), "noop"), (remote, "remote")] {
            let mut sink = Channels::default();
            Delivery::from(result).deliver(&mut sink);
            assert_eq!(sink.fired, [expected]);
        }
    }

    #[test]
    fn outcome_matches_variant() {
        let delivery = Delivery::from(empty());
        assert_eq!(delivery.outcome(), Outcome::NoOp);
        assert!(delivery.result().is_empty());
        assert_eq!(delivery.into_result().commit, CommitSha::from("c1"));
    }

    #[test]
    fn serializes_outcome_and_result() {
        let mut result = empty();
        result.pull.push(pull_op());
        let json = serde_json::to_value(Delivery::from(result)).expect("json");
        assert_eq!(json["outcome"], "remote_ahead");
        assert_eq!(json["result"]["ref"], "refs/heads/main");
        assert_eq!(json["result"]["pull"][0]["path"], "spec/add.yaml");
        assert_eq!(json["result"]["pull"][0]["action"], "pull");
    }
}

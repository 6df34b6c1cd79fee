//! Reconciler: pair local and remote artifacts of one kind and classify each
//! pairing as pull, push, or conflict.
//!
//! A local artifact matches a remote one when its recorded content hash equals
//! the remote hash, or when its normalized name equals the remote name. When
//! several local artifacts match, the first in author order is used.
//!
//! Per remote artifact `R` with first match `L`:
//!
//! | match | hashes | `L.changed` | action |
//! |---|---|---|---|
//! | none | | | pull |
//! | `L` | equal | `Some(true)` | push |
//! | `L` | equal | otherwise | none |
//! | `L` | differ | `Some(false)` | pull |
//! | `L` | differ | otherwise | conflict |
//!
//! Every local artifact with content that matches no remote artifact is
//! pushed to a path built by [`create_path`]. Empty local artifacts are never
//! pushed.

use flowsync_core::{
    create_path, normalize_name, ArtifactKind, ArtifactPair, LocalArtifact, LocalProject,
    RemoteArtifact, SyncAction, SyncOperation,
};
use flowsync_remote::RemoteObjects;

/// The three ordered operation lists produced by reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operations {
    pub pull: Vec<SyncOperation>,
    pub push: Vec<SyncOperation>,
    pub conflict: Vec<SyncOperation>,
}

impl Operations {
    pub fn is_empty(&self) -> bool {
        self.pull.is_empty() && self.push.is_empty() && self.conflict.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pull.len() + self.push.len() + self.conflict.len()
    }

    /// Append `other`'s lists after this one's, preserving order.
    pub fn append(&mut self, other: Operations) {
        self.pull.extend(other.pull);
        self.push.extend(other.push);
        self.conflict.extend(other.conflict);
    }

    fn add(&mut self, action: SyncAction, kind: ArtifactKind, path: String, artifacts: ArtifactPair) {
        let op = SyncOperation {
            action,
            kind,
            path,
            artifacts,
        };
        match action {
            SyncAction::Pull => self.pull.push(op),
            SyncAction::Push => self.push.push(op),
            SyncAction::Conflict => self.conflict.push(op),
        }
    }
}

/// Content-hash match or normalized-name match.
pub fn matches(local: &LocalArtifact, remote: &RemoteArtifact) -> bool {
    local.content_hash.as_ref() == Some(&remote.content_hash)
        || normalize_name(&local.name) == remote.name
}

/// Reconcile one kind. `local` and `remote` must both hold artifacts of `kind`.
pub fn reconcile(
    local: &[&LocalArtifact],
    remote: &[RemoteArtifact],
    kind: ArtifactKind,
) -> Operations {
    let mut ops = Operations::default();

    for r in remote {
        let mut found = local.iter().copied().filter(|l| matches(l, r));
        let Some(l) = found.next() else {
            ops.add(
                SyncAction::Pull,
                kind,
                r.full_path.clone(),
                ArtifactPair::Remote(r.clone()),
            );
            continue;
        };
        let others = found.count();
        if others > 0 {
            tracing::debug!(
                %kind,
                remote = %r.full_path,
                chosen = %l.name,
                others,
                "ambiguous local match, using first"
            );
        }

        let both = || ArtifactPair::Both {
            local: l.clone(),
            remote: r.clone(),
        };
        if l.content_hash.as_ref() == Some(&r.content_hash) {
            if l.changed != Some(true) {
                continue;
            }
            if !l.has_content {
                tracing::debug!(%kind, local = %l.name, "empty local artifact not pushed");
                continue;
            }
            ops.add(SyncAction::Push, kind, r.full_path.clone(), both());
        } else if l.changed == Some(false) {
            ops.add(SyncAction::Pull, kind, r.full_path.clone(), both());
        } else {
            ops.add(SyncAction::Conflict, kind, r.full_path.clone(), both());
        }
    }

    for l in local.iter().copied() {
        if !l.has_content || remote.iter().any(|r| matches(l, r)) {
            continue;
        }
        ops.add(
            SyncAction::Push,
            kind,
            create_path(kind, l),
            ArtifactPair::Local(l.clone()),
        );
    }

    ops
}

/// Reconcile graphs, then components, then specs, and concatenate.
pub fn reconcile_all(project: &LocalProject, remote: &RemoteObjects) -> Operations {
    let mut ops = Operations::default();
    for kind in ArtifactKind::all().iter().copied() {
        ops.append(reconcile(&project.of_kind(kind), remote.of_kind(kind), kind));
    }
    ops
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flowsync_core::ContentHash;
    use rstest::rstest;

    fn component(name: &str, hash: &str) -> RemoteArtifact {
        RemoteArtifact {
            path: format!("{name}.js"),
            full_path: format!("components/{name}.js"),
            content_hash: ContentHash::from(hash),
            kind: ArtifactKind::Component,
            name: name.to_string(),
            language: "javascript".to_string(),
        }
    }

    fn local(name: &str) -> LocalArtifact {
        LocalArtifact::new(ArtifactKind::Component, name).with_language("javascript")
    }

    fn run(local: &[LocalArtifact], remote: &[RemoteArtifact]) -> Operations {
        let refs: Vec<&LocalArtifact> = local.iter().collect();
        reconcile(&refs, remote, ArtifactKind::Component)
    }

    fn paths(ops: &[SyncOperation]) -> Vec<&str> {
        ops.iter().map(|op| op.path.as_str()).collect()
    }

    #[test]
    fn remote_only_is_pulled() {
        let ops = run(&[], &[component("add", "h1")]);
        assert_eq!(paths(&ops.pull), ["components/add.js"]);
        assert!(ops.pull[0].local().is_none());
        assert!(ops.push.is_empty() && ops.conflict.is_empty());
    }

    #[test]
    fn same_hash_and_changed_is_pushed() {
        let ops = run(
            &[local("add").with_hash("h1").with_changed(Some(true))],
            &[component("add", "h1")],
        );
        assert_eq!(paths(&ops.push), ["components/add.js"]);
        assert_eq!(ops.push[0].action, SyncAction::Push);
        assert!(ops.push[0].remote().is_some());
        assert!(ops.pull.is_empty() && ops.conflict.is_empty());
    }

    #[rstest]
    #[case(Some(false))]
    #[case(None)]
    fn same_hash_not_changed_is_noop(#[case] changed: Option<bool>) {
        let ops = run(
            &[local("add").with_hash("h1").with_changed(changed)],
            &[component("add", "h1")],
        );
        assert!(ops.is_empty(), "got {ops:?}");
    }

    #[test]
    fn remote_moved_and_local_unmodified_is_pulled() {
        let ops = run(
            &[local("add").with_hash("h1").with_changed(Some(false))],
            &[component("add", "h2")],
        );
        assert_eq!(paths(&ops.pull), ["components/add.js"]);
        assert_eq!(ops.pull[0].local().map(|l| l.name.as_str()), Some("add"));
        assert!(ops.push.is_empty() && ops.conflict.is_empty());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(true))]
    fn remote_moved_and_local_maybe_modified_conflicts(#[case] changed: Option<bool>) {
        let ops = run(
            &[local("add").with_hash("h1").with_changed(changed)],
            &[component("add", "h2")],
        );
        assert_eq!(paths(&ops.conflict), ["components/add.js"]);
        assert!(ops.pull.is_empty() && ops.push.is_empty());
    }

    #[test]
    fn name_match_without_hash_conflicts() {
        let ops = run(&[local("add")], &[component("add", "h1")]);
        assert_eq!(ops.conflict.len(), 1);
        assert!(ops.push.is_empty(), "matched local is not also pushed as new");
    }

    #[test]
    fn whitespace_names_match_underscored_remote() {
        let ops = run(
            &[local("My Graph").with_hash("h9").with_changed(Some(false))],
            &[component("My_Graph", "h2")],
        );
        assert_eq!(ops.pull.len(), 1);
        assert!(ops.push.is_empty());
    }

    #[test]
    fn hash_match_beats_name_mismatch() {
        let ops = run(
            &[local("renamed").with_hash("h1").with_changed(Some(true))],
            &[component("add", "h1")],
        );
        assert_eq!(paths(&ops.push), ["components/add.js"]);
        assert_eq!(ops.push.len(), 1, "hash-matched local is not pushed twice");
    }

    #[test]
    fn local_only_with_content_is_pushed_to_created_path() {
        let ops = run(
            &[local("Blink Led").with_language("c++")],
            &[component("add", "h1")],
        );
        assert_eq!(paths(&ops.pull), ["components/add.js"]);
        assert_eq!(paths(&ops.push), ["components/Blink_Led.hpp"]);
        assert!(ops.push[0].remote().is_none());
    }

    #[test]
    fn empty_local_artifacts_are_never_pushed() {
        let ops = run(
            &[
                local("new").with_content(false),
                local("add")
                    .with_hash("h1")
                    .with_changed(Some(true))
                    .with_content(false),
            ],
            &[component("add", "h1")],
        );
        assert!(ops.push.is_empty(), "got {:?}", ops.push);
    }

    #[test]
    fn first_match_wins() {
        let ops = run(
            &[
                local("add").with_hash("h0").with_changed(Some(false)),
                local("other").with_hash("h2").with_changed(Some(true)),
            ],
            &[component("add", "h2")],
        );
        // "add" matches by name and comes first; "other" matches by hash.
        assert_eq!(ops.pull.len(), 1);
        assert_eq!(ops.pull[0].local().map(|l| l.name.as_str()), Some("add"));
        assert!(ops.push.is_empty());
    }

    #[test]
    fn graph_local_only_goes_to_json() {
        let graph = LocalArtifact::new(ArtifactKind::Graph, "Main Graph").with_language("fbp");
        let ops = reconcile(&[&graph], &[], ArtifactKind::Graph);
        assert_eq!(paths(&ops.push), ["graphs/Main_Graph.json"]);
        assert_eq!(ops.push[0].kind, ArtifactKind::Graph);
    }

    #[test]
    fn output_follows_remote_then_local_order() {
        let ops = run(
            &[local("zeta"), local("alpha")],
            &[component("c", "1"), component("b", "2"), component("a", "3")],
        );
        assert_eq!(
            paths(&ops.pull),
            ["components/c.js", "components/b.js", "components/a.js"]
        );
        assert_eq!(paths(&ops.push), ["components/zeta.js", "components/alpha.js"]);
    }

    #[test]
    fn reconcile_all_runs_each_kind_in_order() {
        let project = LocalProject {
            repo: None,
            artifacts: vec![
                LocalArtifact::new(ArtifactKind::Spec, "add").with_language("yaml"),
                LocalArtifact::new(ArtifactKind::Graph, "main").with_language("json"),
                // Same name as the remote component, but a different kind.
                LocalArtifact::new(ArtifactKind::Spec, "mul").with_language("yaml"),
            ],
        };
        let mut objects = RemoteObjects::empty("root".into());
        objects.components.push(component("mul", "h1"));

        let ops = reconcile_all(&project, &objects);
        assert_eq!(paths(&ops.pull), ["components/mul.js"]);
        assert_eq!(
            paths(&ops.push),
            ["graphs/main.json", "spec/add.yaml", "spec/mul.yaml"]
        );
        assert_eq!(ops.len(), 4);
    }
}

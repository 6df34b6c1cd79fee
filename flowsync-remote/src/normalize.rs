//! Turn raw tree listings into typed [`RemoteArtifact`] records.

use flowsync_core::kind::{artifact_name, extension_of, language_for_extension, superseded_graph};
use flowsync_core::{ArtifactKind, ContentHash, RemoteArtifact};

use crate::transport::TreeEntry;

/// Classify `entries` of one kind's directory into remote artifacts.
///
/// Only blobs with one of the kind's extensions survive. For graphs, `X.fbp`
/// is dropped when `X.json` is listed alongside it. Output keeps tree order.
pub fn normalize(entries: &[TreeEntry], kind: ArtifactKind, path_prefix: &str) -> Vec<RemoteArtifact> {
    let candidates: Vec<&TreeEntry> = entries
        .iter()
        .filter(|entry| entry.is_blob() && kind.accepts(&entry.path))
        .collect();

    candidates
        .iter()
        .filter(|entry| kind != ArtifactKind::Graph || !superseded(entry, &candidates))
        .map(|entry| to_artifact(entry, kind, path_prefix))
        .collect()
}

fn superseded(entry: &TreeEntry, candidates: &[&TreeEntry]) -> bool {
    let found = superseded_graph(&entry.path, candidates.iter().map(|other| other.path.as_str()));
    if found {
        tracing::debug!(dropped = %entry.path, "graph format precedence");
    }
    found
}

fn to_artifact(entry: &TreeEntry, kind: ArtifactKind, path_prefix: &str) -> RemoteArtifact {
    let extension = extension_of(&entry.path).unwrap_or_default();
    RemoteArtifact {
        path: entry.path.clone(),
        full_path: format!("{path_prefix}{}", entry.path),
        content_hash: ContentHash(entry.sha.clone()),
        kind,
        name: artifact_name(&entry.path).to_string(),
        language: language_for_extension(extension),
    }
}

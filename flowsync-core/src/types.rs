//! Domain types for flowsync reconciliation.
//!
//! Remote identities (repository, commit, tree, blob hashes) are newtypes over
//! `String`. All types are serializable via serde so results can be emitted as
//! JSON and local projects can be loaded from YAML or JSON manifests.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::kind::ArtifactKind;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(pub String);

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The SHA of a commit object in the remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitSha(pub String);

impl fmt::Display for CommitSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CommitSha {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CommitSha {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The SHA of a tree object in the remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeSha(pub String);

impl fmt::Display for TreeSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TreeSha {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TreeSha {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Remote-assigned identity of a blob's exact content.
///
/// Equal hashes imply identical bytes. Local artifacts carry the hash they
/// had at their last sync point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(pub String);

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ContentHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContentHash {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// One artifact found in the remote tree, after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteArtifact {
    /// Path relative to the kind's directory, as listed in its tree.
    pub path: String,
    /// Path relative to the repository root (`graphs/foo.json`).
    pub full_path: String,
    pub content_hash: ContentHash,
    pub kind: ArtifactKind,
    /// File name up to the first `.`.
    pub name: String,
    pub language: String,
}

/// One artifact in the local project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalArtifact {
    /// Author-assigned name; may contain whitespace.
    pub name: String,
    pub kind: ArtifactKind,
    /// Content hash at the last known sync point, if ever synced.
    #[serde(default, rename = "sha", skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<ContentHash>,
    /// `Some(true)` edited since last sync, `Some(false)` verified untouched,
    /// `None` when no tracking information exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,
    #[serde(default = "default_has_content")]
    pub has_content: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Where the artifact lives on disk, when it came from a directory scan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_has_content() -> bool {
    true
}

impl LocalArtifact {
    /// A never-synced artifact with content and no tracking information.
    pub fn new(kind: ArtifactKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            content_hash: None,
            changed: None,
            has_content: true,
            language: None,
            path: None,
        }
    }

    pub fn with_hash(mut self, hash: impl Into<ContentHash>) -> Self {
        self.content_hash = Some(hash.into());
        self
    }

    pub fn with_changed(mut self, changed: Option<bool>) -> Self {
        self.changed = changed;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_content(mut self, has_content: bool) -> Self {
        self.has_content = has_content;
        self
    }
}

/// The local side of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoId>,
    #[serde(default)]
    pub artifacts: Vec<LocalArtifact>,
}

impl LocalProject {
    /// Artifacts of one kind, in author order.
    pub fn of_kind(&self, kind: ArtifactKind) -> Vec<&LocalArtifact> {
        self.artifacts.iter().filter(|a| a.kind == kind).collect()
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Direction of a classified action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Pull,
    Push,
    Conflict,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Pull => write!(f, "pull"),
            SyncAction::Push => write!(f, "push"),
            SyncAction::Conflict => write!(f, "conflict"),
        }
    }
}

/// The artifacts an operation refers to. At least one side is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactPair {
    Local(LocalArtifact),
    Remote(RemoteArtifact),
    Both {
        local: LocalArtifact,
        remote: RemoteArtifact,
    },
}

impl ArtifactPair {
    pub fn local(&self) -> Option<&LocalArtifact> {
        match self {
            ArtifactPair::Local(local) | ArtifactPair::Both { local, .. } => Some(local),
            ArtifactPair::Remote(_) => None,
        }
    }

    pub fn remote(&self) -> Option<&RemoteArtifact> {
        match self {
            ArtifactPair::Remote(remote) | ArtifactPair::Both { remote, .. } => Some(remote),
            ArtifactPair::Local(_) => None,
        }
    }
}

/// One classified synchronization action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOperation {
    pub action: SyncAction,
    pub kind: ArtifactKind,
    /// Repository path the action applies to.
    pub path: String,
    pub artifacts: ArtifactPair,
}

impl SyncOperation {
    pub fn local(&self) -> Option<&LocalArtifact> {
        self.artifacts.local()
    }

    pub fn remote(&self) -> Option<&RemoteArtifact> {
        self.artifacts.remote()
    }
}

/// The git reference a reconciliation run was asked to compare against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Symbolic name such as `refs/heads/main`, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub commit: CommitSha,
}

impl Reference {
    pub fn commit(commit: impl Into<CommitSha>) -> Self {
        Self {
            name: None,
            commit: commit.into(),
        }
    }
}

/// Outcome of one reconciliation run. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub repo: RepoId,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub commit: CommitSha,
    pub tree: TreeSha,
    pub pull: Vec<SyncOperation>,
    pub push: Vec<SyncOperation>,
    pub conflict: Vec<SyncOperation>,
}

impl ReconciliationResult {
    pub fn is_empty(&self) -> bool {
        self.pull.is_empty() && self.push.is_empty() && self.conflict.is_empty()
    }
}

/// Overall category selected for a reconciliation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    NoOp,
    LocalAhead,
    RemoteAhead,
    Mixed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoOp => write!(f, "noop"),
            Outcome::LocalAhead => write!(f, "local"),
            Outcome::RemoteAhead => write!(f, "remote"),
            Outcome::Mixed => write!(f, "both"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

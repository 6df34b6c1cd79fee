//! The consumed transport interface and its wire types.
//!
//! Field names follow the git data API (`tree.sha`, `type`, `truncated`) so
//! both the GitHub transport and snapshot files deserialize straight into
//! these structs.

use std::future::Future;

use serde::{Deserialize, Serialize};

use flowsync_core::{CommitSha, RepoId, TreeSha};

use crate::error::TransportError;

/// Reference to the root tree of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRef {
    pub sha: TreeSha,
}

/// The parts of a commit object the fetcher needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitObject {
    pub tree: TreeRef,
}

/// Object type of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Blob,
    Tree,
    /// Submodule pointer.
    Commit,
    #[serde(other)]
    Other,
}

/// One entry of a tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub sha: String,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::Blob,
            sha: sha.into(),
        }
    }

    pub fn tree(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::Tree,
            sha: sha.into(),
        }
    }

    pub fn is_blob(&self) -> bool {
        self.entry_type == EntryType::Blob
    }

    pub fn is_tree(&self) -> bool {
        self.entry_type == EntryType::Tree
    }
}

/// Ordered entries of one tree object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeListing {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    /// Set by the host when the listing was cut short.
    #[serde(default)]
    pub truncated: bool,
}

impl From<Vec<TreeEntry>> for TreeListing {
    fn from(tree: Vec<TreeEntry>) -> Self {
        Self {
            tree,
            truncated: false,
        }
    }
}

/// Single-shot, non-retrying access to commit and tree objects.
///
/// Credentials are the implementation's concern and accompany every call.
pub trait TreeTransport: Send + Sync {
    /// Resolve a commit. `Ok(None)` means the host has no such commit.
    fn get_commit(
        &self,
        repo: &RepoId,
        sha: &CommitSha,
    ) -> impl Future<Output = Result<Option<CommitObject>, TransportError>> + Send;

    /// List the entries of a tree.
    fn get_tree(
        &self,
        repo: &RepoId,
        sha: &TreeSha,
    ) -> impl Future<Output = Result<TreeListing, TransportError>> + Send;
}

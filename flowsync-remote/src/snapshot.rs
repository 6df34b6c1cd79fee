//! Offline transport backed by a JSON snapshot of commit and tree objects.
//!
//! ```json
//! {
//!   "commits": { "<commit sha>": { "tree": { "sha": "<tree sha>" } } },
//!   "trees":   { "<tree sha>": { "tree": [ { "path": "graphs", "type": "tree", "sha": "…" } ] } }
//! }
//! ```
//!
//! Used by `flowsync check --snapshot` and as the in-memory transport in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use flowsync_core::{CommitSha, RepoId, TreeSha};

use crate::error::TransportError;
use crate::transport::{CommitObject, TreeEntry, TreeListing, TreeRef, TreeTransport};

/// Errors loading a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Commits and trees for any number of repositories; the repository id is
/// ignored on lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotTransport {
    #[serde(default)]
    commits: HashMap<String, CommitObject>,
    #[serde(default)]
    trees: HashMap<String, TreeListing>,
}

impl SnapshotTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| SnapshotError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn with_commit(mut self, commit: impl Into<String>, tree: impl Into<String>) -> Self {
        self.commits.insert(
            commit.into(),
            CommitObject {
                tree: TreeRef {
                    sha: TreeSha(tree.into()),
                },
            },
        );
        self
    }

    pub fn with_tree(mut self, sha: impl Into<String>, entries: Vec<TreeEntry>) -> Self {
        self.trees.insert(sha.into(), TreeListing::from(entries));
        self
    }
}

impl TreeTransport for SnapshotTransport {
    async fn get_commit(
        &self,
        _repo: &RepoId,
        sha: &CommitSha,
    ) -> Result<Option<CommitObject>, TransportError> {
        Ok(self.commits.get(&sha.0).cloned())
    }

    async fn get_tree(&self, _repo: &RepoId, sha: &TreeSha) -> Result<TreeListing, TransportError> {
        self.trees
            .get(&sha.0)
            .cloned()
            .ok_or_else(|| TransportError::Missing { sha: sha.0.clone() })
    }
}

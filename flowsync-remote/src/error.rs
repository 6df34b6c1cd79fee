//! Error types for flowsync-remote.

use std::fmt;

use thiserror::Error;

use flowsync_core::{CommitSha, RepoId};

/// Named stages of one remote fetch, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    FetchCommit,
    FetchRootTree,
    FetchGraphs,
    FetchComponents,
    FetchSpecs,
    Done,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchStage::FetchCommit => "commit",
            FetchStage::FetchRootTree => "root tree",
            FetchStage::FetchGraphs => "graphs tree",
            FetchStage::FetchComponents => "components tree",
            FetchStage::FetchSpecs => "spec tree",
            FetchStage::Done => "done",
        };
        f.write_str(label)
    }
}

/// Failures raised by a [`crate::TreeTransport`]. Never retried here.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The host answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The request never produced a response.
    #[error("network error requesting {url}: {message}")]
    Network { url: String, message: String },

    /// The response body was not the expected JSON.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot transport has no object with this SHA.
    #[error("object {sha} not present in snapshot")]
    Missing { sha: String },

    /// The blocking request task panicked or was cancelled.
    #[error("request task failed: {0}")]
    Join(String),
}

/// All errors that abort a remote fetch. No partial result accompanies them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error while fetching {stage}: {source}")]
    Transport {
        stage: FetchStage,
        #[source]
        source: TransportError,
    },

    #[error("no commit found for {repo} {sha}")]
    CommitNotFound { repo: RepoId, sha: CommitSha },

    /// The repository root carries the legacy single-file manifest.
    #[error("{repo} uses fbp.json, which is not supported")]
    UnsupportedManifest { repo: RepoId },
}

impl FetchError {
    pub(crate) fn transport(stage: FetchStage) -> impl FnOnce(TransportError) -> FetchError {
        move |source| FetchError::Transport { stage, source }
    }
}

//! Error types for flowsync-local.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from scanning or the sync-state store.
#[derive(Debug, Error)]
pub enum LocalError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (state store).
    #[error("sync state JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The scan root does not exist or is not a directory.
    #[error("not a project directory: {path}")]
    NotADirectory { path: PathBuf },
}

/// Convenience constructor for [`LocalError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LocalError {
    LocalError::Io {
        path: path.into(),
        source,
    }
}

//! Error types for flowsync-sync.

use thiserror::Error;

use flowsync_local::LocalError;
use flowsync_remote::FetchError;

/// Any failure that aborts a reconciliation run. No partial result survives.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The local working directory could not be scanned.
    #[error(transparent)]
    Local(#[from] LocalError),
}

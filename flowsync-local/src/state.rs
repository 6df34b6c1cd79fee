//! Sync-state store: what each local file looked like at its last sync.
//!
//! Persists a [`SyncState`] JSON document at `<root>/.flowsync/state.json`.
//! Each entry keeps the remote content hash the file was synced at and a
//! SHA-256 digest of the local bytes at that moment; comparing the digest
//! with the current bytes yields the artifact's `changed` flag.
//! Writes use an atomic `.tmp` + rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use flowsync_core::{CommitSha, ContentHash};

use crate::error::{io_err, LocalError};

/// Last-synced state of one file, keyed by its repository path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileState {
    /// Remote content hash at the last sync.
    pub sha: ContentHash,
    /// SHA-256 hex of the local bytes at the last sync.
    pub digest: String,
}

/// On-disk sync-state payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncState {
    #[serde(default = "Utc::now")]
    pub synced_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitSha>,
    #[serde(default)]
    pub files: BTreeMap<String, FileState>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            synced_at: Utc::now(),
            commit: None,
            files: BTreeMap::new(),
        }
    }
}

impl SyncState {
    /// Record that `path` now matches remote `sha` with local bytes `content`.
    ///
    /// Called by whoever performed the transfer; flowsync itself never moves
    /// bytes.
    pub fn record(&mut self, path: impl Into<String>, sha: impl Into<ContentHash>, content: &[u8]) {
        self.files.insert(
            path.into(),
            FileState {
                sha: sha.into(),
                digest: digest(content),
            },
        );
    }

    /// Stamp the state as synced with `commit` now.
    pub fn mark_synced(&mut self, commit: impl Into<CommitSha>) {
        self.commit = Some(commit.into());
        self.synced_at = Utc::now();
    }

    /// Drop the entry for `path`, returning it if present.
    pub fn forget(&mut self, path: &str) -> Option<FileState> {
        self.files.remove(path)
    }
}

/// `<root>/.flowsync/state.json`
pub fn state_path(root: &Path) -> PathBuf {
    root.join(".flowsync").join("state.json")
}

/// Load the sync state for the project at `root`.
///
/// Returns an empty state if the file does not yet exist.
pub fn load(root: &Path) -> Result<SyncState, LocalError> {
    let path = state_path(root);
    if !path.exists() {
        return Ok(SyncState::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_json::from_str(&contents).map_err(|e| LocalError::Json { path, source: e })
}

/// Save the sync state atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save(root: &Path, state: &SyncState) -> Result<(), LocalError> {
    let path = state_path(root);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid sync state path"),
        ));
    };

    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(state).map_err(|e| LocalError::Json {
        path: path.clone(),
        source: e,
    })?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// SHA-256 hex digest of `content` with CRLF line endings folded to LF.
pub fn digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    let mut rest = content;
    while let Some(idx) = rest.windows(2).position(|w| w == b"\r\n") {
        hasher.update(&rest[..idx]);
        hasher.update(b"\n");
        rest = &rest[idx + 2..];
    }
    hasher.update(rest);
    hex::encode(hasher.finalize())
}

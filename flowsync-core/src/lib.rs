//! flowsync core library: artifact types, per-kind configuration, manifests,
//! and user configuration.
//!
//! - [`types`]: newtypes, artifacts, operations, results
//! - [`kind`]: [`ArtifactKind`] table, name normalization, path construction
//! - [`manifest`]: load a [`LocalProject`] from JSON or YAML
//! - [`config`]: `~/.flowsync/config.yaml`
//! - [`error`]: [`ConfigError`], [`ManifestError`]

pub mod config;
pub mod error;
pub mod kind;
pub mod manifest;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, ManifestError};
pub use kind::{create_path, normalize_name, ArtifactKind};
pub use types::{
    ArtifactPair, CommitSha, ContentHash, LocalArtifact, LocalProject, Outcome,
    ReconciliationResult, Reference, RemoteArtifact, RepoId, SyncAction, SyncOperation, TreeSha,
};

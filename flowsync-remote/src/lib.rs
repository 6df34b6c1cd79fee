//! # flowsync-remote
//!
//! Retrieval and normalization of a remote artifact tree.
//!
//! [`fetch`] resolves a commit through a [`TreeTransport`], descends into the
//! `graphs`, `components`, and `spec` subtrees, and returns
//! [`RemoteObjects`] built by [`normalize`]. Two transports ship with the
//! crate: [`GithubTransport`] and the offline [`SnapshotTransport`].

pub mod error;
pub mod fetch;
pub mod github;
pub mod normalize;
pub mod snapshot;
pub mod transport;

pub use error::{FetchError, FetchStage, TransportError};
pub use fetch::{fetch, RemoteObjects};
pub use github::GithubTransport;
pub use normalize::normalize;
pub use snapshot::{SnapshotError, SnapshotTransport};
pub use transport::{CommitObject, EntryType, TreeEntry, TreeListing, TreeTransport};

//! # flowsync-sync
//!
//! Reconcile a local project against a remote commit and classify the result.
//!
//! Call [`run`] with a transport and a [`LocalProject`](flowsync_core::LocalProject)
//! (or [`run_dir`] with a working directory) to get a [`Delivery`], then hand
//! it to an [`OutcomeSink`].

pub mod classify;
pub mod delivery;
pub mod error;
pub mod pipeline;
pub mod reconcile;

pub use classify::classify;
pub use delivery::{Delivery, OutcomeSink};
pub use error::SyncError;
pub use pipeline::{run, run_dir};
pub use reconcile::{matches, reconcile, reconcile_all, Operations};

//! flowsync local library: scan a working directory into a `LocalProject`
//! and keep the per-file sync state that drives change tracking.
//!
//! - [`scan`]: list `graphs/`, `components/`, `spec/` under a project root
//! - [`state`]: `<root>/.flowsync/state.json`
//! - [`error`]: [`LocalError`]
//!
//! Nothing here writes the state store on its own. After a pull or push has
//! moved bytes, the caller records the new baseline with
//! [`SyncState::record`] and [`state::save`]; `flowsync record` does this
//! from the command line.

pub mod error;
pub mod scan;
pub mod state;

pub use error::LocalError;
pub use scan::{scan, scan_with_state};
pub use state::{digest, FileState, SyncState};

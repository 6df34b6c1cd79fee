//! Build a [`LocalProject`] from a working directory.
//!
//! `scan(root)` lists `graphs/`, `components/`, and `spec/` directly under
//! `root` (no recursion) and accepts files with the same extension table the
//! remote normalizer uses. Change tracking comes from the sync-state store:
//!
//! | state entry | `content_hash` | `changed` |
//! |---|---|---|
//! | absent | `None` | `None` |
//! | present, digest matches | recorded sha | `Some(false)` |
//! | present, digest differs | recorded sha | `Some(true)` |
//!
//! As on the remote side, `graphs/X.fbp` is skipped when `graphs/X.json`
//! sits next to it.

use std::fs;
use std::path::{Path, PathBuf};

use flowsync_core::kind::{
    artifact_name, extension_of, language_for_extension, superseded_graph,
};
use flowsync_core::{ArtifactKind, LocalArtifact, LocalProject};

use crate::error::{io_err, LocalError};
use crate::state::{self, SyncState};

/// Scan `root`, reading change tracking from `<root>/.flowsync/state.json`.
pub fn scan(root: &Path) -> Result<LocalProject, LocalError> {
    if !root.is_dir() {
        return Err(LocalError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let state = state::load(root)?;
    scan_with_state(root, &state)
}

/// Scan `root` against an already-loaded sync state.
pub fn scan_with_state(root: &Path, state: &SyncState) -> Result<LocalProject, LocalError> {
    let mut artifacts = Vec::new();
    for kind in ArtifactKind::all().iter().copied() {
        let dir = root.join(kind.directory());
        if !dir.is_dir() {
            continue;
        }

        let mut entries: Vec<(String, PathBuf)> = fs::read_dir(&dir)
            .map_err(|e| io_err(&dir, e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
            .filter(|(file_name, _)| {
                let accepted = kind.accepts(file_name);
                if !accepted {
                    tracing::debug!(file = %file_name, %kind, "skipping unrecognised extension");
                }
                accepted
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
        let kept: Vec<bool> = names
            .iter()
            .map(|name| kind != ArtifactKind::Graph || !superseded_graph(name, names.iter().copied()))
            .collect();

        for ((file_name, path), keep) in entries.iter().zip(kept) {
            if !keep {
                tracing::debug!(dropped = %file_name, "graph format precedence");
                continue;
            }
            let file_name = file_name.as_str();
            let path = path.clone();
            let content = fs::read(&path).map_err(|e| io_err(&path, e))?;
            let repo_path = format!("{}{file_name}", kind.path_prefix());

            let tracked = state.files.get(&repo_path);
            let changed = tracked.map(|file| file.digest != state::digest(&content));
            let extension = extension_of(&file_name).unwrap_or_default();

            artifacts.push(LocalArtifact {
                name: artifact_name(&file_name).to_string(),
                kind,
                content_hash: tracked.map(|file| file.sha.clone()),
                changed,
                has_content: !content.is_empty(),
                language: Some(language_for_extension(extension)),
                path: Some(path),
            });
        }
    }
    Ok(LocalProject {
        repo: None,
        artifacts,
    })
}

//! Remote tree fetcher.
//!
//! One fetch walks a fixed chain of stages, each awaiting the previous:
//!
//! 1. `FetchCommit`: resolve the commit (`CommitNotFound` if absent)
//! 2. `FetchRootTree`: list the commit's root tree; refuse `fbp.json`
//! 3. `FetchGraphs` / `FetchComponents` / `FetchSpecs`: only for the
//!    directories that exist, in that order
//! 4. `Done`
//!
//! The first failure ends the chain; nothing fetched so far is returned.

use flowsync_core::kind::LEGACY_MANIFEST;
use flowsync_core::{ArtifactKind, CommitSha, RemoteArtifact, RepoId, TreeSha};

use crate::error::{FetchError, FetchStage};
use crate::normalize::normalize;
use crate::transport::{TreeListing, TreeTransport};

/// Normalized artifacts of one commit, grouped by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObjects {
    /// Root tree of the fetched commit.
    pub tree: TreeSha,
    pub graphs: Vec<RemoteArtifact>,
    pub components: Vec<RemoteArtifact>,
    pub specs: Vec<RemoteArtifact>,
}

impl RemoteObjects {
    pub fn empty(tree: TreeSha) -> Self {
        Self {
            tree,
            graphs: Vec::new(),
            components: Vec::new(),
            specs: Vec::new(),
        }
    }

    pub fn of_kind(&self, kind: ArtifactKind) -> &[RemoteArtifact] {
        match kind {
            ArtifactKind::Graph => &self.graphs,
            ArtifactKind::Component => &self.components,
            ArtifactKind::Spec => &self.specs,
        }
    }

    fn of_kind_mut(&mut self, kind: ArtifactKind) -> &mut Vec<RemoteArtifact> {
        match kind {
            ArtifactKind::Graph => &mut self.graphs,
            ArtifactKind::Component => &mut self.components,
            ArtifactKind::Spec => &mut self.specs,
        }
    }

    pub fn len(&self) -> usize {
        self.graphs.len() + self.components.len() + self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Well-known subtrees found at the repository root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RootDirectories {
    graphs: Option<TreeSha>,
    components: Option<TreeSha>,
    specs: Option<TreeSha>,
}

impl RootDirectories {
    fn get(&self, kind: ArtifactKind) -> Option<&TreeSha> {
        match kind {
            ArtifactKind::Graph => self.graphs.as_ref(),
            ArtifactKind::Component => self.components.as_ref(),
            ArtifactKind::Spec => self.specs.as_ref(),
        }
    }
}

fn stage_for(kind: ArtifactKind) -> FetchStage {
    match kind {
        ArtifactKind::Graph => FetchStage::FetchGraphs,
        ArtifactKind::Component => FetchStage::FetchComponents,
        ArtifactKind::Spec => FetchStage::FetchSpecs,
    }
}

/// Fetch and normalize the artifacts of `commit` in `repo`.
pub async fn fetch<T: TreeTransport>(
    transport: &T,
    repo: &RepoId,
    commit: &CommitSha,
) -> Result<RemoteObjects, FetchError> {
    let stage = FetchStage::FetchCommit;
    tracing::debug!(%repo, %commit, %stage, "fetch stage");
    let commit_object = transport
        .get_commit(repo, commit)
        .await
        .map_err(FetchError::transport(stage))?
        .ok_or_else(|| FetchError::CommitNotFound {
            repo: repo.clone(),
            sha: commit.clone(),
        })?;
    let root_sha = commit_object.tree.sha;

    let stage = FetchStage::FetchRootTree;
    tracing::debug!(%repo, tree = %root_sha, %stage, "fetch stage");
    let root = transport
        .get_tree(repo, &root_sha)
        .await
        .map_err(FetchError::transport(stage))?;
    let directories = scan_root(repo, &root)?;

    let mut objects = RemoteObjects::empty(root_sha);
    for kind in ArtifactKind::all().iter().copied() {
        let Some(sha) = directories.get(kind) else {
            continue;
        };
        let stage = stage_for(kind);
        tracing::debug!(%repo, tree = %sha, %stage, "fetch stage");
        let listing = transport
            .get_tree(repo, sha)
            .await
            .map_err(FetchError::transport(stage))?;
        let artifacts = normalize(&listing.tree, kind, &kind.path_prefix());
        objects.of_kind_mut(kind).extend(artifacts);
    }

    tracing::debug!(
        %repo,
        %commit,
        stage = %FetchStage::Done,
        graphs = objects.graphs.len(),
        components = objects.components.len(),
        specs = objects.specs.len(),
        "fetch stage"
    );
    Ok(objects)
}

fn scan_root(repo: &RepoId, root: &TreeListing) -> Result<RootDirectories, FetchError> {
    let mut directories = RootDirectories::default();
    for entry in &root.tree {
        if entry.is_blob() && entry.path == LEGACY_MANIFEST {
            return Err(FetchError::UnsupportedManifest { repo: repo.clone() });
        }
        if !entry.is_tree() {
            continue;
        }
        let slot = match ArtifactKind::from_directory(&entry.path) {
            Some(ArtifactKind::Graph) => &mut directories.graphs,
            Some(ArtifactKind::Component) => &mut directories.components,
            Some(ArtifactKind::Spec) => &mut directories.specs,
            None => continue,
        };
        *slot = Some(TreeSha(entry.sha.clone()));
    }
    Ok(directories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TreeEntry;

    #[test]
    fn scan_root_finds_known_directories_only() {
        let root = TreeListing::from(vec![
            TreeEntry::tree("graphs", "g"),
            TreeEntry::tree("src", "x"),
            TreeEntry::blob("spec", "not-a-tree"),
            TreeEntry::tree("components", "c"),
        ]);
        let dirs = scan_root(&RepoId::from("a/b"), &root).expect("scan");
        assert_eq!(dirs.graphs, Some(TreeSha::from("g")));
        assert_eq!(dirs.components, Some(TreeSha::from("c")));
        assert!(dirs.specs.is_none(), "a blob named spec is not a directory");
    }

    #[test]
    fn scan_root_refuses_legacy_manifest_blob() {
        let root = TreeListing::from(vec![
            TreeEntry::tree("graphs", "g"),
            TreeEntry::blob("fbp.json", "m"),
        ]);
        let err = scan_root(&RepoId::from("a/b"), &root).unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedManifest { .. }));
    }

    #[test]
    fn legacy_manifest_directory_is_ignored() {
        let root = TreeListing::from(vec![TreeEntry::tree("fbp.json", "m")]);
        let dirs = scan_root(&RepoId::from("a/b"), &root).expect("scan");
        assert_eq!(dirs, RootDirectories::default());
    }
}

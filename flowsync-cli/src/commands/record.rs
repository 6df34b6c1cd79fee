//! `flowsync record`: store the current local bytes as the synced baseline.
//!
//! Run after a pull or push has brought local files in line with a remote
//! commit. Every remote artifact at that commit whose file exists under the
//! working directory is recorded with the remote content hash and a digest
//! of the local bytes, so the next `check` sees it as unmodified.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use flowsync_core::{config, CommitSha, RemoteArtifact, RepoId};
use flowsync_local::state::{self, SyncState};
use flowsync_remote::{fetch, GithubTransport, RemoteObjects, SnapshotTransport, TreeTransport};

/// Arguments for `flowsync record`.
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Repository in `owner/name` form.
    pub repo: String,

    /// Commit SHA the local files now match.
    pub commit: String,

    /// Repository paths to record (e.g. components/add.js). All by default.
    pub paths: Vec<String>,

    /// Working directory to record (defaults to the current directory).
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Read commits and trees from a snapshot file instead of the network.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RecordJson {
    commit: String,
    recorded: Vec<String>,
    missing: Vec<String>,
}

impl RecordArgs {
    pub fn run(self) -> Result<()> {
        let root = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("could not determine current directory")?,
        };
        if !root.is_dir() {
            bail!("{} is not a directory", root.display());
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let objects = runtime.block_on(self.fetch_remote())?;

        let mut sync = state::load(&root)
            .with_context(|| format!("failed to load sync state for {}", root.display()))?;
        let report = self.record(&root, &objects, &mut sync)?;
        state::save(&root, &sync)
            .with_context(|| format!("failed to save sync state for {}", root.display()))?;
        tracing::debug!(recorded = report.recorded.len(), commit = %self.commit, "sync state saved");

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize result")?
            );
            return Ok(());
        }
        print_report(&self.repo, &report);
        Ok(())
    }

    async fn fetch_remote(&self) -> Result<RemoteObjects> {
        let repo = RepoId::from(self.repo.as_str());
        let commit = CommitSha::from(self.commit.as_str());
        match &self.snapshot {
            Some(path) => {
                let transport = SnapshotTransport::load(path)
                    .with_context(|| format!("failed to load snapshot {}", path.display()))?;
                fetch_with(&transport, &repo, &commit).await
            }
            None => {
                let config = config::load()
                    .context("failed to load ~/.flowsync/config.yaml")?
                    .apply_env();
                let transport = GithubTransport::new(&config);
                fetch_with(&transport, &repo, &commit).await
            }
        }
    }

    fn record(
        &self,
        root: &Path,
        objects: &RemoteObjects,
        sync: &mut SyncState,
    ) -> Result<RecordJson> {
        let remote: Vec<&RemoteArtifact> = objects
            .graphs
            .iter()
            .chain(&objects.components)
            .chain(&objects.specs)
            .collect();
        for path in &self.paths {
            if !remote.iter().any(|r| &r.full_path == path) {
                bail!("{path} is not an artifact of {}@{}", self.repo, self.commit);
            }
        }

        let mut report = RecordJson {
            commit: self.commit.clone(),
            recorded: Vec::new(),
            missing: Vec::new(),
        };
        for artifact in remote {
            if !self.paths.is_empty() && !self.paths.contains(&artifact.full_path) {
                continue;
            }
            let local = root.join(&artifact.full_path);
            if !local.is_file() {
                report.missing.push(artifact.full_path.clone());
                continue;
            }
            let content = std::fs::read(&local)
                .with_context(|| format!("failed to read {}", local.display()))?;
            sync.record(
                artifact.full_path.clone(),
                artifact.content_hash.clone(),
                &content,
            );
            report.recorded.push(artifact.full_path.clone());
        }
        sync.mark_synced(self.commit.as_str());
        Ok(report)
    }
}

async fn fetch_with<T: TreeTransport>(
    transport: &T,
    repo: &RepoId,
    commit: &CommitSha,
) -> Result<RemoteObjects> {
    fetch(transport, repo, commit)
        .await
        .with_context(|| format!("failed to fetch {repo} at {commit}"))
}

fn print_report(repo: &str, report: &RecordJson) {
    let short = report.commit.get(..7).unwrap_or(&report.commit);
    println!(
        "{} recorded {} file(s) at {repo}@{short}",
        "■".green().bold(),
        report.recorded.len()
    );
    for path in &report.recorded {
        println!("  {path}");
    }
    for path in &report.missing {
        println!("  {} {path} (not present locally)", "skipped".bright_black());
    }
}

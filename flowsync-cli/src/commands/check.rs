//! `flowsync check`: reconcile a local project against a remote commit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use flowsync_core::{
    config, manifest, CommitSha, LocalProject, ReconciliationResult, Reference, RepoId,
    SyncAction, SyncOperation,
};
use flowsync_remote::{GithubTransport, SnapshotTransport, TreeTransport};
use flowsync_sync::{run, Delivery, OutcomeSink};

/// Arguments for `flowsync check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Repository in `owner/name` form.
    pub repo: String,

    /// Commit SHA to compare against.
    pub commit: String,

    /// Symbolic reference the commit was resolved from (e.g. refs/heads/main).
    #[arg(long = "ref")]
    pub reference: Option<String>,

    /// Working directory to scan (defaults to the current directory).
    #[arg(long, conflicts_with = "manifest")]
    pub dir: Option<PathBuf>,

    /// Read the local project from a JSON or YAML manifest instead of scanning.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Read commits and trees from a snapshot file instead of the network.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let delivery = runtime.block_on(self.reconcile())?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&delivery).context("failed to serialize result")?
            );
            return Ok(());
        }

        delivery.deliver(&mut TextReport);
        Ok(())
    }

    async fn reconcile(&self) -> Result<Delivery> {
        let project = self.load_project()?;
        tracing::debug!(artifacts = project.artifacts.len(), "local project loaded");
        let repo = RepoId::from(self.repo.as_str());
        let reference = Reference {
            name: self.reference.clone(),
            commit: CommitSha::from(self.commit.as_str()),
        };

        match &self.snapshot {
            Some(path) => {
                let transport = SnapshotTransport::load(path)
                    .with_context(|| format!("failed to load snapshot {}", path.display()))?;
                reconcile_with(&transport, &repo, &reference, &project).await
            }
            None => {
                let config = config::load()
                    .context("failed to load ~/.flowsync/config.yaml")?
                    .apply_env();
                let transport = GithubTransport::new(&config);
                reconcile_with(&transport, &repo, &reference, &project).await
            }
        }
    }

    fn load_project(&self) -> Result<LocalProject> {
        if let Some(path) = &self.manifest {
            return manifest::load(path)
                .with_context(|| format!("failed to load manifest {}", path.display()));
        }
        let root = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("could not determine current directory")?,
        };
        flowsync_local::scan(&root).with_context(|| format!("failed to scan {}", root.display()))
    }
}

async fn reconcile_with<T: TreeTransport>(
    transport: &T,
    repo: &RepoId,
    reference: &Reference,
    project: &LocalProject,
) -> Result<Delivery> {
    run(transport, repo, reference, project)
        .await
        .with_context(|| format!("reconciliation of {repo} at {} failed", reference.commit))
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// Prints one colored headline per outcome and a table of operations.
struct TextReport;

impl OutcomeSink for TextReport {
    fn no_op(&mut self, result: ReconciliationResult) {
        println!(
            "{} local matches {}: nothing to do",
            "■".green().bold(),
            target(&result)
        );
    }

    fn local_ahead(&mut self, result: ReconciliationResult) {
        println!(
            "{} local is ahead of {}: {} to push",
            "■".cyan().bold(),
            target(&result),
            result.push.len()
        );
        print_operations(&result);
    }

    fn remote_ahead(&mut self, result: ReconciliationResult) {
        println!(
            "{} {} is ahead of local: {} to pull",
            "■".yellow().bold(),
            target(&result),
            result.pull.len()
        );
        print_operations(&result);
    }

    fn mixed(&mut self, result: ReconciliationResult) {
        println!(
            "{} local and {} have both moved: {} to pull, {} to push, {} in conflict",
            "■".red().bold(),
            target(&result),
            result.pull.len(),
            result.push.len(),
            result.conflict.len()
        );
        print_operations(&result);
    }
}

#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "path")]
    path: String,
    #[tabled(rename = "local")]
    local: String,
    #[tabled(rename = "remote")]
    remote: String,
}

fn target(result: &ReconciliationResult) -> String {
    match &result.reference {
        Some(name) => format!("{}@{} ({})", result.repo, short(&result.commit.0), name),
        None => format!("{}@{}", result.repo, short(&result.commit.0)),
    }
}

fn short(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

fn print_operations(result: &ReconciliationResult) {
    let rows: Vec<OperationRow> = result
        .conflict
        .iter()
        .chain(&result.pull)
        .chain(&result.push)
        .map(operation_row)
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn operation_row(op: &SyncOperation) -> OperationRow {
    let action = op.action.to_string().to_uppercase();
    let action = match op.action {
        SyncAction::Pull => action.yellow().to_string(),
        SyncAction::Push => action.cyan().to_string(),
        SyncAction::Conflict => action.red().bold().to_string(),
    };
    OperationRow {
        action,
        kind: op.kind.to_string(),
        path: op.path.clone(),
        local: op
            .local()
            .map(|l| match &l.content_hash {
                Some(hash) => format!("{} ({})", l.name, short(&hash.0)),
                None => l.name.clone(),
            })
            .unwrap_or_else(|| "-".to_string()),
        remote: op
            .remote()
            .map(|r| short(&r.content_hash.0).to_string())
            .unwrap_or_else(|| "-".to_string()),
    }
}

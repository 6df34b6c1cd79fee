//! `flowsync status`: change tracking for a local working directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use flowsync_core::LocalArtifact;
use flowsync_local::state;

/// Arguments for `flowsync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Working directory to scan (defaults to the current directory).
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let root = match self.dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("could not determine current directory")?,
        };
        let project = flowsync_local::scan(&root)
            .with_context(|| format!("failed to scan {}", root.display()))?;
        let sync = state::load(&root)
            .with_context(|| format!("failed to load sync state for {}", root.display()))?;
        let last_sync = (!sync.files.is_empty()).then(|| sync.synced_at.to_rfc3339());

        let rows: Vec<ArtifactStatus> = project.artifacts.iter().map(ArtifactStatus::of).collect();
        if self.json {
            let payload = StatusJson {
                root: root.display().to_string(),
                last_sync,
                commit: sync.commit.map(|c| c.0),
                artifacts: rows,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_table(&root, last_sync.as_deref(), rows);
        Ok(())
    }
}

/// Local change state, from most to least actionable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum ChangeState {
    Modified,
    Untracked,
    Unmodified,
    Empty,
}

impl ChangeState {
    fn of(artifact: &LocalArtifact) -> Self {
        if !artifact.has_content {
            return ChangeState::Empty;
        }
        match artifact.changed {
            Some(true) => ChangeState::Modified,
            Some(false) => ChangeState::Unmodified,
            None => ChangeState::Untracked,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ChangeState::Modified => "MODIFIED",
            ChangeState::Untracked => "UNTRACKED",
            ChangeState::Unmodified => "UNMODIFIED",
            ChangeState::Empty => "EMPTY",
        }
    }

    fn indicator(self) -> String {
        match self {
            ChangeState::Modified => "■".red().bold().to_string(),
            ChangeState::Untracked => "■".yellow().bold().to_string(),
            ChangeState::Unmodified => "■".green().bold().to_string(),
            ChangeState::Empty => "■".bright_black().bold().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ArtifactStatus {
    kind: String,
    name: String,
    language: Option<String>,
    path: Option<String>,
    state: ChangeState,
}

impl ArtifactStatus {
    fn of(artifact: &LocalArtifact) -> Self {
        Self {
            kind: artifact.kind.to_string(),
            name: artifact.name.clone(),
            language: artifact.language.clone(),
            path: artifact.path.as_ref().map(|p| p.display().to_string()),
            state: ChangeState::of(artifact),
        }
    }
}

#[derive(Serialize)]
struct StatusJson {
    root: String,
    last_sync: Option<String>,
    commit: Option<String>,
    artifacts: Vec<ArtifactStatus>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "language")]
    language: String,
    #[tabled(rename = "state")]
    state: String,
}

fn print_table(root: &std::path::Path, last_sync: Option<&str>, rows: Vec<ArtifactStatus>) {
    println!(
        "flowsync v{} | {} | {} artifacts | last sync {}",
        env!("CARGO_PKG_VERSION"),
        root.display(),
        rows.len(),
        last_sync.unwrap_or("never"),
    );

    if rows.is_empty() {
        println!("No graphs, components or specs found.");
        return;
    }

    println!(
        "Indicators: {} MODIFIED  {} UNTRACKED  {} UNMODIFIED  {} EMPTY",
        ChangeState::Modified.indicator(),
        ChangeState::Untracked.indicator(),
        ChangeState::Unmodified.indicator(),
        ChangeState::Empty.indicator(),
    );
    let table_rows: Vec<StatusTableRow> = rows
        .into_iter()
        .map(|row| StatusTableRow {
            kind: row.kind,
            name: row.name,
            language: row.language.unwrap_or_else(|| "-".to_string()),
            state: format!("{} {}", row.state.indicator(), row.state.label()),
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");
}

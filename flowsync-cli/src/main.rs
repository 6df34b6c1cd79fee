//! flowsync: compare a local flow-based project with a remote repository.
//!
//! # Usage
//!
//! ```text
//! flowsync check <repo> <commit> [--ref <name>] [--dir <path> | --manifest <file>]
//!                [--snapshot <file>] [--json]
//! flowsync record <repo> <commit> [<path>...] [--dir <path>] [--snapshot <file>] [--json]
//! flowsync status [--dir <path>] [--json]
//! flowsync config show|path|init
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    check::CheckArgs, config::ConfigCommand, record::RecordArgs, status::StatusArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "flowsync",
    version,
    about = "Reconcile local graphs, components and specs with a remote repository",
    long_about = None,
)]
struct Cli {
    /// Log debug detail to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile a local project against one remote commit.
    Check(CheckArgs),

    /// Record local files as in sync with a remote commit.
    Record(RecordArgs),

    /// Show change tracking for the artifacts in a working directory.
    Status(StatusArgs),

    /// Inspect or create ~/.flowsync/config.yaml.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Check(args) => args.run(),
        Commands::Record(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Config { command } => commands::config::run(command),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

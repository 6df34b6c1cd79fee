//! `flowsync config`: inspect or create the user configuration file.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use flowsync_core::config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (file plus environment), token masked.
    Show {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path.
    Path,

    /// Write a default configuration file if none exists.
    Init,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show { json } => show(json),
        ConfigCommand::Path => {
            let path = config::config_path().context("could not determine home directory")?;
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Init => init(),
    }
}

fn show(json: bool) -> Result<()> {
    let effective = config::load()
        .context("failed to load ~/.flowsync/config.yaml")?
        .apply_env()
        .redacted();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&effective).context("failed to serialize config")?
        );
        return Ok(());
    }

    println!("{:<14}{}", "api_base".bold(), effective.api_base);
    println!(
        "{:<14}{}",
        "token".bold(),
        effective.token.as_deref().unwrap_or("(none)")
    );
    println!("{:<14}{}", "timeout_secs".bold(), effective.timeout_secs);
    println!("{:<14}{}", "user_agent".bold(), effective.user_agent);
    Ok(())
}

fn init() -> Result<()> {
    let path = config::config_path().context("could not determine home directory")?;
    if path.exists() {
        println!("{} already exists", path.display());
        return Ok(());
    }
    config::save(&config::Config::default()).context("failed to write config")?;
    println!("{} {}", "created".green().bold(), path.display());
    Ok(())
}

//! Config command - show or create the configuration file.

use aiusage_store::{Config, StoreError};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, ExitCode};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file path.
    Path,

    /// Print the effective configuration (defaults when no file exists).
    Show,

    /// Write a default config file.
    Init {
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<ExitCode> {
    let path = Config::default_path()?;

    match &args.action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = Config::load_from(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            let formatter = JsonFormatter::new(true);
            println!("{}", formatter.format(&config)?);
            if !path.exists() && !cli.quiet {
                eprintln!("(defaults; no file at {})", path.display());
            }
        }
        ConfigAction::Init { force } => match Config::init(&path, *force).await {
            Ok(()) => {
                info!(path = %path.display(), "Config initialized");
                println!("Wrote {}", path.display());
            }
            Err(StoreError::AlreadyExists(existing)) => {
                eprintln!("{} already exists (use --force to replace it)", existing.display());
                return Ok(ExitCode::Error);
            }
            Err(e) => return Err(e.into()),
        },
    }

    Ok(ExitCode::Success)
}

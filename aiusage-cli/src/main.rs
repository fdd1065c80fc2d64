// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! aiusage CLI - usage statistics from all your AI coding tools.
//!
//! # Examples
//!
//! ```bash
//! # Usage table for every tool
//! aiusage
//!
//! # One tool
//! aiusage --tool claude-code
//!
//! # JSON or CSV output
//! aiusage --format json
//! aiusage usage --format csv
//!
//! # Where each tool keeps its data
//! aiusage doctor
//!
//! # Supported tools
//! aiusage list
//!
//! # Configuration
//! aiusage config init
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, doctor, list, usage};

// ============================================================================
// CLI Definition
// ============================================================================

/// aiusage CLI - AI coding tool usage.
#[derive(Parser)]
#[command(name = "aiusage")]
#[command(about = "Query usage statistics from all your AI coding tools in one command")]
#[command(long_about = r"
aiusage reads the usage data your AI coding tools already keep on disk (or
behind their usage APIs) and reports tokens and requests for today, this
week, this month, and all time.

Nothing is written to any tool's data. Run `aiusage list` for the supported
tools and `aiusage doctor` to see where each one is looked for.

Examples:
  aiusage                        # All tools
  aiusage --tool cursor          # Single tool
  aiusage --tool claude,codex    # Several tools
  aiusage --format json          # JSON output
  aiusage doctor                 # Data source check
")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'usage' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments for the default 'usage' command.
    #[command(flatten)]
    pub usage: usage::UsageArgs,

    /// Verbose output (debug logs and data sources).
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode (no logs, errors only).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show usage (default if no command specified).
    #[command(visible_alias = "u")]
    Usage(usage::UsageArgs),

    /// Check where each tool's data is expected and whether it exists.
    Doctor(doctor::DoctorArgs),

    /// List supported tools.
    List,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
    /// One row per tool and period.
    Csv,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Fatal error (config unreadable, no home directory).
    Error = 1,
    /// Bad arguments (unknown tool).
    BadArguments = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("aiusage=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aiusage=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Usage(args)) => usage::run(args, &cli).await,
        Some(Commands::Doctor(args)) => doctor::run(args, &cli),
        Some(Commands::List) => list::run(),
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => usage::run(&cli.usage, &cli).await,
    };

    match result {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(ExitCode::Error as i32);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_takes_usage_args() {
        let cli = Cli::try_parse_from(["aiusage", "--tool", "cursor", "--format", "csv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.usage.tool, vec!["cursor"]);
        assert_eq!(cli.usage.format, OutputFormat::Csv);
    }

    #[test]
    fn test_usage_subcommand() {
        let cli = Cli::try_parse_from(["aiusage", "usage", "-t", "claude,codex", "-v"]).unwrap();
        let Some(Commands::Usage(args)) = cli.command else {
            panic!("expected usage command");
        };
        assert_eq!(args.tool, vec!["claude", "codex"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_doctor_rejects_csv() {
        assert!(Cli::try_parse_from(["aiusage", "doctor", "--format", "csv"]).is_err());
        assert!(Cli::try_parse_from(["aiusage", "doctor", "--format", "json"]).is_ok());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["aiusage", "-v", "-q"]).is_err());
    }
}

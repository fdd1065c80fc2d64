//! Doctor command - locate every tool's data without reading it.

use aiusage_providers::Doctor;
use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::info;

use super::build_context;
use crate::output::{JsonFormatter, TextFormatter, use_colors};
use crate::{Cli, ExitCode};

/// Output formats the doctor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum DoctorFormat {
    /// Human-readable listing.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Arguments for the doctor command.
#[derive(Args, Default)]
pub struct DoctorArgs {
    /// Output format.
    #[arg(long, short, value_enum, default_value_t)]
    pub format: DoctorFormat,
}

/// Runs the doctor command.
pub fn run(args: &DoctorArgs, cli: &Cli) -> Result<ExitCode> {
    let ctx = build_context()?;
    let report = Doctor::run(&ctx);
    info!(found = report.found, total = report.total, "Doctor finished");

    let output = match args.format {
        DoctorFormat::Table => {
            TextFormatter::new(use_colors()).format_doctor(&report)
        }
        DoctorFormat::Json => JsonFormatter::new(cli.pretty).format(&report)?,
    };
    println!("{output}");

    Ok(ExitCode::Success)
}

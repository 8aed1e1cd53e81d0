//! fleetcheck — consistency and activity checks for one scaling group.
//!
//! # Usage
//!
//! ```text
//! fleetcheck --fixture fleet.json web-asg
//! fleetcheck --config fleetcheck.toml --format json --at 2026-10-19T12:00:00Z web-asg
//! ```
//!
//! Exit codes: 0 passed, 1 validation failed, 2 usage, 3 credentials,
//! 4 not found, 5 internal error.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::Parser;

mod commands;

use commands::check::{CheckArgs, Format};

#[derive(Parser)]
#[command(
    name = "fleetcheck",
    about = "Validate the consistency and recent activity of an auto-scaling group",
    version
)]
struct Cli {
    /// Name of the scaling group to check.
    group: String,

    /// Configuration file (default: ./fleetcheck.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON fleet document to read fleet state from.
    /// Overrides [provider].fixture in the config file.
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Evaluate as of this RFC 3339 instant instead of the current time.
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    /// Skip fleet-activity when fleet-consistency does not pass.
    #[arg(long)]
    stop_on_failure: bool,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "fleetcheck=debug"
    } else {
        "fleetcheck=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive)),
        )
        .init();

    let args = CheckArgs {
        group: cli.group,
        config: cli.config,
        fixture: cli.fixture,
        format: cli.format,
        at: cli.at,
        stop_on_failure: cli.stop_on_failure,
    };

    commands::check::check(&args).into()
}

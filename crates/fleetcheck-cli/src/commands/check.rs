use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use tracing::debug;

use fleetcheck_core::FleetcheckConfig;
use fleetcheck_provider::FixtureProvider;
use fleetcheck_validate::{
    CheckSession, ErrorKind, HaltPolicy, SessionReport, StepOutcome, Verdict,
};

const DEFAULT_CONFIG: &str = "fleetcheck.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

pub struct CheckArgs {
    pub group: String,
    pub config: Option<PathBuf>,
    pub fixture: Option<PathBuf>,
    pub format: Option<Format>,
    pub at: Option<DateTime<Utc>>,
    pub stop_on_failure: bool,
}

/// Process-level result of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    ValidationFailed,
    Usage,
    Credential,
    NotFound,
    Internal,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Passed => 0,
            Outcome::ValidationFailed => 1,
            Outcome::Usage => 2,
            Outcome::Credential => 3,
            Outcome::NotFound => 4,
            Outcome::Internal => 5,
        }
    }

    fn from_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass | Verdict::Idle => Outcome::Passed,
            Verdict::Fail => Outcome::ValidationFailed,
            Verdict::Error => Outcome::Internal,
        }
    }

    fn from_error(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Credential => Outcome::Credential,
            ErrorKind::NotFound => Outcome::NotFound,
            ErrorKind::ValidationFailed => Outcome::ValidationFailed,
            ErrorKind::EmptyInstanceSet | ErrorKind::Provider => Outcome::Internal,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(o: Outcome) -> Self {
        ExitCode::from(o.code())
    }
}

pub fn check(args: &CheckArgs) -> Outcome {
    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Outcome::Usage;
        }
    };

    let format = match resolve_format(args.format, &config) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Outcome::Usage;
        }
    };

    let Some(fixture) = args
        .fixture
        .clone()
        .or_else(|| config.fixture_path().map(PathBuf::from))
    else {
        eprintln!("Error: no fleet document given; pass --fixture or set [provider].fixture");
        return Outcome::Usage;
    };

    let credentials = match config.credentials_from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid credentials: {e:#}");
            return Outcome::Credential;
        }
    };

    let provider = match FixtureProvider::open(&fixture, credentials) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            return Outcome::Internal;
        }
    };

    let policy = if args.stop_on_failure || config.stop_on_failure() {
        HaltPolicy::StopOnFailure
    } else {
        HaltPolicy::RunAll
    };
    let now = args.at.unwrap_or_else(Utc::now);
    debug!(group = %args.group, %now, ?policy, "starting check");

    match CheckSession::new(provider).with_policy(policy).run(&args.group, now) {
        Ok(report) => {
            match render(&report, format) {
                Ok(out) => print!("{out}"),
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    return Outcome::Internal;
                }
            }
            Outcome::from_verdict(report.verdict)
        }
        Err(e) => {
            let kind = e.kind();
            match kind {
                ErrorKind::Credential => eprintln!("Invalid credentials: {e}"),
                ErrorKind::NotFound => {
                    eprintln!("Error: {e}. Please provide a correct scaling group name")
                }
                _ => eprintln!("Error: {e}"),
            }
            Outcome::from_error(kind)
        }
    }
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<FleetcheckConfig> {
    match explicit {
        Some(path) => FleetcheckConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            if default.exists() {
                FleetcheckConfig::from_file(default)
                    .with_context(|| format!("failed to load config {DEFAULT_CONFIG}"))
            } else {
                Ok(FleetcheckConfig::default())
            }
        }
    }
}

fn resolve_format(flag: Option<Format>, config: &FleetcheckConfig) -> anyhow::Result<Format> {
    if let Some(f) = flag {
        return Ok(f);
    }
    match config.format() {
        None => Ok(Format::Text),
        Some(s) => Format::from_str(s, true)
            .map_err(|_| anyhow::anyhow!("unknown output format in config: {s}")),
    }
}

pub fn render(report: &SessionReport, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Text => Ok(render_text(report)),
        Format::Json => {
            let mut out = serde_json::to_string_pretty(report)?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn verdict_label(v: Verdict) -> &'static str {
    match v {
        Verdict::Pass => "PASS",
        Verdict::Idle => "PASS (zero capacity)",
        Verdict::Fail => "FAIL",
        Verdict::Error => "ERROR",
    }
}

fn render_text(report: &SessionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "fleetcheck {} at {}",
        report.group,
        report.evaluated_at.to_rfc3339()
    );
    for scenario in &report.scenarios {
        let _ = writeln!(out, "{}: {}", scenario.scenario, verdict_label(scenario.verdict));
        for step in &scenario.steps {
            let label = match step.outcome {
                StepOutcome::Pass => "PASS",
                StepOutcome::Fail { .. } => "FAIL",
                StepOutcome::Error { .. } => "ERROR",
            };
            let _ = writeln!(out, "  {label} {}: {}", step.step, step.message);
        }
    }
    let _ = writeln!(out, "result: {}", verdict_label(report.verdict));
    out
}

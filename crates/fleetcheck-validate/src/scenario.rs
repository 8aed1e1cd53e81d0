//! Scenario runner — the two fixed check sequences.
//!
//! A scenario runs its steps in order and stops at the first step that does
//! not pass. The returned [`ScenarioReport`] keeps every executed step and
//! every metric produced before the stopping point.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use fleetcheck_core::{GroupSnapshot, ScheduledAction};

use crate::aggregators::{
    Countdown, Uptime, longest_uptime, next_scheduled_action, same_day_churn_count,
};
use crate::error::{CheckError, CheckResult, ErrorKind};
use crate::validators::{capacity, homogeneity, zone_spread};

/// The named check scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    FleetConsistency,
    FleetActivity,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::FleetConsistency => "fleet-consistency",
            Scenario::FleetActivity => "fleet-activity",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Individual steps across both scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    ZeroCapacity,
    CapacityMatches,
    ZoneDistribution,
    ConfigHomogeneous,
    LongestUptime,
    NextScheduledAction,
    SameDayChurn,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::ZeroCapacity => "zero-capacity",
            Step::CapacityMatches => "capacity-matches",
            Step::ZoneDistribution => "zone-distribution",
            Step::ConfigHomogeneous => "config-homogeneous",
            Step::LongestUptime => "longest-uptime",
            Step::NextScheduledAction => "next-scheduled-action",
            Step::SameDayChurn => "same-day-churn",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tagged outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Pass,
    Fail { reason: String },
    Error { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    #[serde(flatten)]
    pub outcome: StepOutcome,
    /// Human-readable line naming the rule and the observed values.
    pub message: String,
}

/// Overall result of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    /// Passed because the group is configured for zero capacity.
    Idle,
    Fail,
    Error,
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Pass | Verdict::Idle)
    }
}

/// Derived values reported alongside the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum Metric {
    LongestUptime {
        instance: String,
        seconds: i64,
        hms: String,
    },
    NextScheduledAction {
        action: Option<String>,
        start_time: Option<DateTime<Utc>>,
        seconds_until: Option<i64>,
        hms: Option<String>,
    },
    SameDayChurn {
        date: NaiveDate,
        count: usize,
    },
}

impl From<&Uptime> for Metric {
    fn from(u: &Uptime) -> Self {
        Metric::LongestUptime {
            instance: u.instance.clone(),
            seconds: u.duration.num_seconds(),
            hms: u.hms(),
        }
    }
}

impl From<Option<&Countdown>> for Metric {
    fn from(c: Option<&Countdown>) -> Self {
        Metric::NextScheduledAction {
            action: c.and_then(|c| c.action.name.clone()),
            start_time: c.map(|c| c.action.start_time),
            seconds_until: c.map(|c| c.delta.num_seconds()),
            hms: c.map(Countdown::hms),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::LongestUptime { instance, hms, .. } => {
                write!(f, "longest running instance uptime: {hms} ({instance})")
            }
            Metric::NextScheduledAction { hms: None, .. } => {
                f.write_str("no scheduled actions are present")
            }
            Metric::NextScheduledAction { hms: Some(hms), action, .. } => match action {
                Some(name) => write!(f, "next scheduled action {name} runs in: {hms}"),
                None => write!(f, "next scheduled action runs in: {hms}"),
            },
            Metric::SameDayChurn { date, count } => {
                write!(f, "instances launched and terminated on {date}: {count}")
            }
        }
    }
}

/// Result of running one scenario against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub group: String,
    pub verdict: Verdict,
    pub steps: Vec<StepRecord>,
    pub metrics: Vec<Metric>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.verdict.is_success()
    }

    /// The step that stopped the scenario, if any.
    pub fn stopped_at(&self) -> Option<&StepRecord> {
        self.steps
            .iter()
            .find(|s| !matches!(s.outcome, StepOutcome::Pass))
    }
}

/// What a passing step hands back to the run.
struct Passed {
    message: String,
    metric: Option<Metric>,
}

impl Passed {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            metric: None,
        }
    }

    fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }
}

/// Accumulates step records for one scenario.
struct ScenarioRun {
    report: ScenarioReport,
}

impl ScenarioRun {
    fn new(scenario: Scenario, group: &str) -> Self {
        Self {
            report: ScenarioReport {
                scenario,
                group: group.to_string(),
                verdict: Verdict::Pass,
                steps: Vec::new(),
                metrics: Vec::new(),
            },
        }
    }

    /// Record a step. Returns `false` when the scenario must stop.
    fn record(&mut self, step: Step, result: CheckResult<Passed>) -> bool {
        let scenario = self.report.scenario;
        let (outcome, message, verdict) = match result {
            Ok(passed) => {
                debug!(%scenario, %step, message = %passed.message, "step passed");
                if let Some(metric) = passed.metric {
                    self.report.metrics.push(metric);
                }
                (StepOutcome::Pass, passed.message, None)
            }
            Err(CheckError::ValidationFailed { detail, .. }) => {
                warn!(%scenario, %step, %detail, "step failed");
                (
                    StepOutcome::Fail { reason: detail.clone() },
                    detail,
                    Some(Verdict::Fail),
                )
            }
            Err(e) => {
                warn!(%scenario, %step, error = %e, "step errored");
                let message = e.to_string();
                (
                    StepOutcome::Error { kind: e.kind(), message: message.clone() },
                    message,
                    Some(Verdict::Error),
                )
            }
        };

        self.report.steps.push(StepRecord { step, outcome, message });
        match verdict {
            Some(v) => {
                self.report.verdict = v;
                false
            }
            None => true,
        }
    }

    fn idle(&mut self, message: String) {
        info!(scenario = %self.report.scenario, group = %self.report.group, "desired capacity is zero");
        self.report.steps.push(StepRecord {
            step: Step::ZeroCapacity,
            outcome: StepOutcome::Pass,
            message,
        });
        self.report.verdict = Verdict::Idle;
    }

    fn finish(self) -> ScenarioReport {
        info!(
            scenario = %self.report.scenario,
            group = %self.report.group,
            verdict = ?self.report.verdict,
            steps = self.report.steps.len(),
            "scenario finished"
        );
        self.report
    }
}

fn failed(step: Step, detail: String) -> CheckError {
    CheckError::ValidationFailed { step, detail }
}

fn check_capacity(snapshot: &GroupSnapshot) -> CheckResult<Passed> {
    let c = capacity(snapshot);
    let observed = format!("{} in service, {} desired", c.in_service, c.desired);
    if c.matches() {
        Ok(Passed::new(observed))
    } else {
        Err(failed(
            Step::CapacityMatches,
            format!("desired capacity does not match running instance count ({observed})"),
        ))
    }
}

fn check_zones(snapshot: &GroupSnapshot) -> CheckResult<Passed> {
    let z = zone_spread(snapshot);
    let observed = format!(
        "{} in service across {} of {} configured zones",
        z.running, z.occupied, z.configured
    );
    if z.is_valid() {
        Ok(Passed::new(observed))
    } else {
        Err(failed(
            Step::ZoneDistribution,
            format!(
                "instances are not distributed among the available zones ({observed}, {} required)",
                z.required()
            ),
        ))
    }
}

fn check_homogeneity(snapshot: &GroupSnapshot) -> CheckResult<Passed> {
    let h = homogeneity(snapshot)?;
    match h.mismatch {
        None => Ok(Passed::new(format!(
            "vpc, security groups and image match {}",
            h.reference
        ))),
        Some(other) => Err(failed(
            Step::ConfigHomogeneous,
            format!(
                "vpc, security groups or image of {other} differ from {}",
                h.reference
            ),
        )),
    }
}

fn check_uptime(snapshot: &GroupSnapshot, now: DateTime<Utc>) -> CheckResult<Passed> {
    let uptime = longest_uptime(snapshot, now)?;
    let metric = Metric::from(&uptime);
    Ok(Passed::new(metric.to_string()).with_metric(metric))
}

/// fleet-consistency: capacity, zone spread, configuration, then uptime.
///
/// A group with zero desired capacity passes immediately as [`Verdict::Idle`]
/// without evaluating any other rule.
pub fn fleet_consistency(snapshot: &GroupSnapshot, now: DateTime<Utc>) -> ScenarioReport {
    let mut run = ScenarioRun::new(Scenario::FleetConsistency, &snapshot.name);

    if snapshot.desired_capacity == 0 {
        run.idle(format!(
            "group {} has a desired capacity of 0",
            snapshot.name
        ));
        return run.finish();
    }

    if !run.record(Step::CapacityMatches, check_capacity(snapshot)) {
        return run.finish();
    }
    if !run.record(Step::ZoneDistribution, check_zones(snapshot)) {
        return run.finish();
    }
    if !run.record(Step::ConfigHomogeneous, check_homogeneity(snapshot)) {
        return run.finish();
    }
    run.record(Step::LongestUptime, check_uptime(snapshot, now));

    run.finish()
}

/// fleet-activity: next scheduled action (informational), then same-day
/// churn.
pub fn fleet_activity(
    snapshot: &GroupSnapshot,
    actions: &[ScheduledAction],
    now: DateTime<Utc>,
) -> ScenarioReport {
    let mut run = ScenarioRun::new(Scenario::FleetActivity, &snapshot.name);

    let next = next_scheduled_action(actions, now);
    let metric = Metric::from(next.as_ref());
    run.record(
        Step::NextScheduledAction,
        Ok(Passed::new(metric.to_string()).with_metric(metric)),
    );

    let today = now.date_naive();
    let metric = Metric::SameDayChurn {
        date: today,
        count: same_day_churn_count(snapshot, today),
    };
    run.record(
        Step::SameDayChurn,
        Ok(Passed::new(metric.to_string()).with_metric(metric)),
    );

    run.finish()
}

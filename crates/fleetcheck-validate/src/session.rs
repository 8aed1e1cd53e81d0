//! CheckSession — one complete run for one scaling group.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use fleetcheck_provider::{FleetStateProvider, fetch_snapshot};

use crate::error::CheckResult;
use crate::scenario::{ScenarioReport, Verdict, fleet_activity, fleet_consistency};

/// Whether a failed consistency scenario stops the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HaltPolicy {
    /// Run every scenario regardless of earlier failures.
    #[default]
    RunAll,
    /// Skip remaining scenarios after the first one that does not pass.
    StopOnFailure,
}

/// Reports of every scenario that ran. The session verdict is the worst
/// scenario verdict (`Pass < Idle < Fail < Error`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub group: String,
    pub evaluated_at: DateTime<Utc>,
    pub verdict: Verdict,
    pub scenarios: Vec<ScenarioReport>,
}

impl SessionReport {
    pub fn passed(&self) -> bool {
        self.verdict.is_success()
    }
}

/// Drives credential validation, snapshot materialization and both
/// scenarios against a single provider.
pub struct CheckSession<P> {
    provider: P,
    policy: HaltPolicy,
}

impl<P: FleetStateProvider> CheckSession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            policy: HaltPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: HaltPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run both scenarios for `group` as of `now`.
    ///
    /// Credential and lookup failures abort the session before any scenario
    /// runs and are returned as errors. Rule violations are reported inside
    /// the [`SessionReport`].
    pub fn run(&self, group: &str, now: DateTime<Utc>) -> CheckResult<SessionReport> {
        self.provider.validate_credentials()?;

        let snapshot = fetch_snapshot(&self.provider, group)?;
        let actions = self.provider.describe_scheduled_actions(group)?;
        info!(
            group,
            instances = snapshot.instances.len(),
            in_service = snapshot.in_service_count(),
            scheduled_actions = actions.len(),
            "snapshot fetched"
        );

        let mut scenarios = Vec::with_capacity(2);

        let consistency = fleet_consistency(&snapshot, now);
        let halt = self.policy == HaltPolicy::StopOnFailure && !consistency.passed();
        scenarios.push(consistency);

        if halt {
            warn!(group, "fleet-consistency did not pass, skipping fleet-activity");
        } else {
            scenarios.push(fleet_activity(&snapshot, &actions, now));
        }

        let verdict = scenarios
            .iter()
            .map(|s| s.verdict)
            .max()
            .unwrap_or(Verdict::Pass);

        Ok(SessionReport {
            group: snapshot.name,
            evaluated_at: now,
            verdict,
            scenarios,
        })
    }
}

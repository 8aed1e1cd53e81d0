//! Temporal aggregators — uptime, next scheduled action, same-day churn.
//!
//! `now` (or `today`) is always passed in; nothing here reads the clock.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use fleetcheck_core::{GroupSnapshot, InstanceId, ScheduledAction};

use crate::error::{CheckError, CheckResult};

/// Longest uptime among in-service instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uptime {
    pub instance: InstanceId,
    pub duration: TimeDelta,
}

impl Uptime {
    pub fn hms(&self) -> String {
        format_hms(self.duration)
    }
}

/// `now - launch_time` maximized over in-service instances. The first
/// instance in provider order wins ties.
pub fn longest_uptime(snapshot: &GroupSnapshot, now: DateTime<Utc>) -> CheckResult<Uptime> {
    let mut longest: Option<Uptime> = None;
    for instance in snapshot.in_service() {
        let duration = now - instance.launch_time;
        if longest.as_ref().is_none_or(|l| duration > l.duration) {
            longest = Some(Uptime {
                instance: instance.id.clone(),
                duration,
            });
        }
    }
    longest.ok_or_else(|| CheckError::EmptyInstanceSet {
        check: "longest-uptime",
        group: snapshot.name.clone(),
    })
}

/// The scheduled action closest to `now` and the signed time until it.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    pub action: ScheduledAction,
    /// `start_time - now`; negative once the action has started.
    pub delta: TimeDelta,
}

impl Countdown {
    pub fn is_past(&self) -> bool {
        self.delta < TimeDelta::zero()
    }

    /// Magnitude of the delta as `HH:MM:SS`.
    pub fn hms(&self) -> String {
        format_hms(self.delta)
    }
}

/// Pick the action whose start time is nearest to `now` in either direction.
///
/// Ties keep the first action seen. An empty slice yields `None`, which
/// means "no scheduled action" rather than an error.
pub fn next_scheduled_action(
    actions: &[ScheduledAction],
    now: DateTime<Utc>,
) -> Option<Countdown> {
    let mut best: Option<Countdown> = None;
    for action in actions {
        let delta = action.start_time - now;
        if best.as_ref().is_none_or(|b| delta.abs() < b.delta.abs()) {
            best = Some(Countdown {
                action: action.clone(),
                delta,
            });
        }
    }
    best
}

/// Not-in-service instances whose launch falls on `today` (UTC calendar day).
pub fn same_day_churn_count(snapshot: &GroupSnapshot, today: NaiveDate) -> usize {
    snapshot
        .not_in_service()
        .filter(|i| i.launch_time.date_naive() == today)
        .count()
}

/// Render the magnitude of a duration as `HH:MM:SS`.
///
/// Sub-second precision is truncated, never rounded. Hours keep growing past
/// 24 and the sign is dropped.
pub fn format_hms(delta: TimeDelta) -> String {
    let secs = delta.num_seconds().unsigned_abs();
    let hh = secs / 3600;
    let mm = (secs % 3600) / 60;
    let ss = secs % 60;
    format!("{hh:02}:{mm:02}:{ss:02}")
}

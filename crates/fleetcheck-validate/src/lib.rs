//! fleetcheck-validate — consistency checks for a scaling group.
//!
//! Turns a [`GroupSnapshot`](fleetcheck_core::GroupSnapshot) into verdicts
//! and derived metrics. Everything here is a pure function of its inputs:
//! the snapshot, the scheduled actions, and an injected evaluation instant.
//!
//! # Architecture
//!
//! ```text
//! CheckSession
//!   ├── FleetStateProvider::validate_credentials()
//!   ├── fetch_snapshot() + describe_scheduled_actions()
//!   ├── fleet-consistency
//!   │   ├── desired == 0            → Idle, stop
//!   │   ├── capacity_matches()      → Fail, stop
//!   │   ├── zone_distribution_valid → Fail, stop
//!   │   ├── config_homogeneous()    → Fail / EmptyInstanceSet, stop
//!   │   └── longest_uptime()        → metric
//!   └── fleet-activity
//!       ├── next_scheduled_action() → metric (or none)
//!       └── same_day_churn_count()  → metric
//! ```
//!
//! Each step yields a tagged outcome (`Pass`, `Fail`, `Error`). Whether a
//! failed scenario halts the rest of the session is the caller's
//! [`HaltPolicy`].

pub mod aggregators;
pub mod error;
pub mod scenario;
pub mod session;
pub mod validators;

pub use aggregators::{
    Countdown, Uptime, format_hms, longest_uptime, next_scheduled_action, same_day_churn_count,
};
pub use error::{CheckError, CheckResult, ErrorKind};
pub use scenario::{
    Metric, Scenario, ScenarioReport, Step, StepOutcome, StepRecord, Verdict, fleet_activity,
    fleet_consistency,
};
pub use session::{CheckSession, HaltPolicy, SessionReport};
pub use validators::{
    CapacityCheck, Homogeneity, ZoneSpread, capacity, capacity_matches, config_homogeneous,
    homogeneity, zone_distribution_valid, zone_spread,
};

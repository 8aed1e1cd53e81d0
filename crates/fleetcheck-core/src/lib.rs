//! fleetcheck-core — data model shared by every fleetcheck crate.
//!
//! A [`GroupSnapshot`] is a point-in-time view of one scaling group and its
//! member [`InstanceRecord`]s. Snapshots are assembled from the two raw
//! provider responses ([`GroupDescription`] and [`InstanceDescription`]) and
//! are never mutated afterwards.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Credentials, FleetcheckConfig};
pub use error::{SnapshotError, SnapshotResult};
pub use types::*;

//! Domain types for scaling-group snapshots.
//!
//! Two families of types live here:
//!
//! - raw provider responses ([`GroupDescription`], [`InstanceDescription`],
//!   [`ScheduledAction`]) as a Fleet State Provider hands them over, and
//! - the assembled snapshot ([`GroupSnapshot`], [`InstanceRecord`]) that the
//!   validators and aggregators consume.
//!
//! All types serialize to/from JSON with RFC 3339 timestamps.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, SnapshotResult};

/// Name of a scaling group (caller-supplied key).
pub type GroupName = String;

/// Identifier of an instance, unique within a group.
pub type InstanceId = String;

/// Raw lifecycle state that counts as in service.
pub const IN_SERVICE: &str = "InService";

// ── Raw provider responses ────────────────────────────────────────

/// A scaling group as returned by the provider's group lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupDescription {
    pub name: GroupName,
    pub desired_capacity: u32,
    /// Configured availability zones. Duplicates are ignored.
    pub availability_zones: Vec<String>,
    /// Group membership in provider order.
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

/// One membership entry of a group description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupMember {
    pub instance_id: InstanceId,
    /// Raw lifecycle string, e.g. "InService", "Terminating", "Pending".
    pub lifecycle_state: String,
    pub availability_zone: String,
}

/// Per-instance details from the provider's instance lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceDescription {
    pub instance_id: InstanceId,
    pub launch_time: DateTime<Utc>,
    pub vpc_id: String,
    #[serde(default)]
    pub security_groups: Vec<String>,
    pub image_id: String,
}

/// A time-triggered capacity change registered for a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledAction {
    pub group_name: GroupName,
    pub start_time: DateTime<Utc>,
    /// Provider-side action name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ── Snapshot ──────────────────────────────────────────────────────

/// Lifecycle state collapsed to the two values the checks care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    InService,
    NotInService,
}

impl LifecycleState {
    /// Map a raw provider lifecycle string. Only an exact `InService` counts.
    pub fn from_raw(raw: &str) -> Self {
        if raw == IN_SERVICE {
            LifecycleState::InService
        } else {
            LifecycleState::NotInService
        }
    }
}

/// The configuration triple compared by the homogeneity check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceMetadata {
    pub vpc_id: String,
    /// Stored as a set so ordering differences between lookups don't matter.
    pub security_groups: BTreeSet<String>,
    pub image_id: String,
}

/// A single group member joined with its instance details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: InstanceId,
    pub lifecycle: LifecycleState,
    /// The provider's lifecycle string before collapsing.
    pub raw_lifecycle: String,
    pub availability_zone: String,
    pub launch_time: DateTime<Utc>,
    pub metadata: InstanceMetadata,
}

impl InstanceRecord {
    pub fn is_in_service(&self) -> bool {
        self.lifecycle == LifecycleState::InService
    }
}

/// Point-in-time view of one scaling group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub name: GroupName,
    pub desired_capacity: u32,
    pub availability_zones: BTreeSet<String>,
    /// Member records in provider order.
    pub instances: Vec<InstanceRecord>,
}

impl GroupSnapshot {
    /// Join a group description with its instance descriptions.
    ///
    /// `descriptions` is positional: entry `n` describes member `n`, so a
    /// member listed twice is paired with two descriptions and kept twice.
    /// Member order is preserved. Surplus descriptions are ignored; a member
    /// with no description is an error.
    pub fn assemble(
        group: GroupDescription,
        descriptions: Vec<InstanceDescription>,
    ) -> SnapshotResult<Self> {
        if let Some(unpaired) = group.members.get(descriptions.len()) {
            return Err(SnapshotError::MissingInstance {
                group: group.name.clone(),
                instance: unpaired.instance_id.clone(),
            });
        }

        let instances = group
            .members
            .into_iter()
            .zip(descriptions)
            .map(|(member, detail)| InstanceRecord::from_parts(member, detail))
            .collect();

        Ok(Self {
            name: group.name,
            desired_capacity: group.desired_capacity,
            availability_zones: group.availability_zones.into_iter().collect(),
            instances,
        })
    }

    /// In-service members, in provider order.
    pub fn in_service(&self) -> impl Iterator<Item = &InstanceRecord> {
        self.instances.iter().filter(|i| i.is_in_service())
    }

    /// Members in any other lifecycle state, in provider order.
    pub fn not_in_service(&self) -> impl Iterator<Item = &InstanceRecord> {
        self.instances.iter().filter(|i| !i.is_in_service())
    }

    pub fn in_service_count(&self) -> usize {
        self.in_service().count()
    }
}

impl InstanceRecord {
    /// Build a record from a membership entry and its description.
    pub fn from_parts(member: GroupMember, detail: InstanceDescription) -> Self {
        Self {
            lifecycle: LifecycleState::from_raw(&member.lifecycle_state),
            id: member.instance_id,
            raw_lifecycle: member.lifecycle_state,
            availability_zone: member.availability_zone,
            launch_time: detail.launch_time,
            metadata: InstanceMetadata {
                vpc_id: detail.vpc_id,
                security_groups: detail.security_groups.into_iter().collect(),
                image_id: detail.image_id,
            },
        }
    }
}

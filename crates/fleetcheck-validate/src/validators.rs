//! Fleet validators — pure predicates over one snapshot.
//!
//! Each predicate has a diagnostic form (`capacity`, `zone_spread`,
//! `homogeneity`) that returns the observed values, so a failed rule can be
//! reported with the numbers that broke it.

use std::collections::HashSet;

use fleetcheck_core::{GroupSnapshot, InstanceId};

use crate::error::{CheckError, CheckResult};

/// Observed in-service count against desired capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityCheck {
    pub in_service: usize,
    pub desired: u32,
}

impl CapacityCheck {
    pub fn matches(&self) -> bool {
        self.in_service == self.desired as usize
    }
}

pub fn capacity(snapshot: &GroupSnapshot) -> CapacityCheck {
    CapacityCheck {
        in_service: snapshot.in_service_count(),
        desired: snapshot.desired_capacity,
    }
}

/// True iff the in-service count equals desired capacity.
pub fn capacity_matches(snapshot: &GroupSnapshot) -> bool {
    capacity(snapshot).matches()
}

/// Zone spread of the in-service instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSpread {
    /// R: in-service instances.
    pub running: usize,
    /// A: configured availability zones.
    pub configured: usize,
    /// Z: distinct zones occupied by in-service instances.
    pub occupied: usize,
}

impl ZoneSpread {
    /// Two regimes:
    ///
    /// - `R <= A`: every running instance must sit in its own zone (`Z == R`).
    /// - `R > A`: every configured zone must be occupied (`Z == A`).
    ///
    /// A single instance (or none) is always valid.
    pub fn is_valid(&self) -> bool {
        if self.running <= 1 {
            return true;
        }
        if self.running <= self.configured {
            self.occupied == self.running
        } else {
            self.occupied == self.configured
        }
    }

    /// The zone count the current regime requires.
    pub fn required(&self) -> usize {
        if self.running <= self.configured {
            self.running
        } else {
            self.configured
        }
    }
}

pub fn zone_spread(snapshot: &GroupSnapshot) -> ZoneSpread {
    let occupied: HashSet<&str> = snapshot
        .in_service()
        .map(|i| i.availability_zone.as_str())
        .collect();
    ZoneSpread {
        running: snapshot.in_service_count(),
        configured: snapshot.availability_zones.len(),
        occupied: occupied.len(),
    }
}

pub fn zone_distribution_valid(snapshot: &GroupSnapshot) -> bool {
    zone_spread(snapshot).is_valid()
}

/// Outcome of comparing every in-service instance against the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homogeneity {
    /// First in-service instance in provider order.
    pub reference: InstanceId,
    /// First instance whose (vpc, security groups, image) differs.
    pub mismatch: Option<InstanceId>,
}

impl Homogeneity {
    pub fn is_homogeneous(&self) -> bool {
        self.mismatch.is_none()
    }
}

pub fn homogeneity(snapshot: &GroupSnapshot) -> CheckResult<Homogeneity> {
    let mut running = snapshot.in_service();
    let reference = running.next().ok_or_else(|| CheckError::EmptyInstanceSet {
        check: "config-homogeneous",
        group: snapshot.name.clone(),
    })?;

    let mismatch = running
        .find(|i| i.metadata != reference.metadata)
        .map(|i| i.id.clone());

    Ok(Homogeneity {
        reference: reference.id.clone(),
        mismatch,
    })
}

/// True iff every in-service instance shares the first one's configuration.
///
/// Fails with `EmptyInstanceSet` when nothing is in service.
pub fn config_homogeneous(snapshot: &GroupSnapshot) -> CheckResult<bool> {
    Ok(homogeneity(snapshot)?.is_homogeneous())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fleetcheck_core::{InstanceMetadata, InstanceRecord, LifecycleState};

    fn record(id: &str, state: LifecycleState, zone: &str) -> InstanceRecord {
        InstanceRecord {
            id: id.to_string(),
            lifecycle: state,
            raw_lifecycle: match state {
                LifecycleState::InService => "InService".into(),
                LifecycleState::NotInService => "Terminated".into(),
            },
            availability_zone: zone.to_string(),
            launch_time: Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap(),
            metadata: InstanceMetadata {
                vpc_id: "vpc-1".into(),
                security_groups: ["sg-1".to_string(), "sg-2".to_string()].into(),
                image_id: "ami-1".into(),
            },
        }
    }

    fn running(zones: &[&str]) -> Vec<InstanceRecord> {
        zones
            .iter()
            .enumerate()
            .map(|(n, z)| record(&format!("i-{n}"), LifecycleState::InService, z))
            .collect()
    }

    fn snapshot(desired: u32, configured: &[&str], instances: Vec<InstanceRecord>) -> GroupSnapshot {
        GroupSnapshot {
            name: "web".into(),
            desired_capacity: desired,
            availability_zones: configured.iter().map(|z| z.to_string()).collect(),
            instances,
        }
    }

    const FIVE_ZONES: [&str; 5] = ["a", "b", "c", "d", "e"];
    const THREE_ZONES: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn capacity_matches_iff_in_service_equals_desired() {
        for running_count in 0..6usize {
            for stopped in 0..3usize {
                for desired in 0..6u32 {
                    let mut instances: Vec<_> = (0..running_count)
                        .map(|n| record(&format!("r-{n}"), LifecycleState::InService, "a"))
                        .collect();
                    instances.extend(
                        (0..stopped)
                            .map(|n| record(&format!("s-{n}"), LifecycleState::NotInService, "a")),
                    );
                    let snap = snapshot(desired, &["a"], instances);
                    assert_eq!(
                        capacity_matches(&snap),
                        running_count == desired as usize,
                        "running={running_count} stopped={stopped} desired={desired}"
                    );
                }
            }
        }
    }

    #[test]
    fn zero_desired_zero_running_matches() {
        let snap = snapshot(0, &["a"], vec![]);
        assert!(capacity_matches(&snap));
        assert_eq!(capacity(&snap), CapacityCheck { in_service: 0, desired: 0 });
    }

    #[test]
    fn single_instance_always_spread() {
        let configs: [&[&str]; 3] = [&[], &["a"], &FIVE_ZONES];
        for configured in configs {
            let snap = snapshot(1, configured, running(&["z"]));
            assert!(zone_distribution_valid(&snap));
        }
    }

    #[test]
    fn under_provisioned_requires_one_zone_per_instance() {
        let snap = snapshot(3, &FIVE_ZONES, running(&["a", "b", "c"]));
        assert!(zone_distribution_valid(&snap));

        let snap = snapshot(3, &FIVE_ZONES, running(&["a", "b", "b"]));
        let spread = zone_spread(&snap);
        assert_eq!(spread, ZoneSpread { running: 3, configured: 5, occupied: 2 });
        assert_eq!(spread.required(), 3);
        assert!(!spread.is_valid());
    }

    #[test]
    fn over_provisioned_requires_every_zone() {
        let snap = snapshot(5, &THREE_ZONES, running(&["a", "b", "c", "a", "b"]));
        assert!(zone_distribution_valid(&snap));

        let snap = snapshot(5, &THREE_ZONES, running(&["a", "b", "a", "b", "a"]));
        let spread = zone_spread(&snap);
        assert_eq!(spread.required(), 3);
        assert!(!spread.is_valid());
    }

    #[test]
    fn stopped_instances_do_not_count_towards_spread() {
        let mut instances = running(&["a", "a"]);
        instances.push(record("i-x", LifecycleState::NotInService, "b"));
        let snap = snapshot(2, &["a", "b"], instances);
        assert_eq!(zone_spread(&snap).occupied, 1);
        assert!(!zone_distribution_valid(&snap));
    }

    #[test]
    fn identical_configuration_is_homogeneous() {
        let snap = snapshot(2, &["a", "b"], running(&["a", "b"]));
        assert!(config_homogeneous(&snap).unwrap());
    }

    #[test]
    fn differing_image_is_not_homogeneous() {
        let mut instances = running(&["a", "b", "c"]);
        instances[2].metadata.image_id = "ami-2".into();
        let snap = snapshot(3, &THREE_ZONES, instances);

        let h = homogeneity(&snap).unwrap();
        assert_eq!(h.reference, "i-0");
        assert_eq!(h.mismatch.as_deref(), Some("i-2"));
        assert!(!config_homogeneous(&snap).unwrap());
    }

    #[test]
    fn differing_vpc_is_not_homogeneous() {
        let mut instances = running(&["a", "b", "c"]);
        instances[1].metadata.vpc_id = "vpc-2".into();
        let snap = snapshot(3, &THREE_ZONES, instances);

        assert_eq!(homogeneity(&snap).unwrap().mismatch.as_deref(), Some("i-1"));
        assert!(!config_homogeneous(&snap).unwrap());
    }

    #[test]
    fn extra_security_group_is_not_homogeneous() {
        let mut instances = running(&["a", "b", "c"]);
        instances[1].metadata.security_groups.insert("sg-3".into());
        let snap = snapshot(3, &THREE_ZONES, instances);

        assert_eq!(homogeneity(&snap).unwrap().mismatch.as_deref(), Some("i-1"));
        assert!(!config_homogeneous(&snap).unwrap());
    }

    #[test]
    fn reference_skips_stopped_instances() {
        let mut stopped = record("i-old", LifecycleState::NotInService, "a");
        stopped.metadata.vpc_id = "vpc-legacy".into();
        let mut instances = vec![stopped];
        instances.extend(running(&["a", "b"]));
        let snap = snapshot(2, &["a", "b"], instances);

        let h = homogeneity(&snap).unwrap();
        assert_eq!(h.reference, "i-0");
        assert!(h.is_homogeneous());
    }

    #[test]
    fn no_running_instances_is_empty_instance_set() {
        let snap = snapshot(
            2,
            &["a"],
            vec![record("i-1", LifecycleState::NotInService, "a")],
        );
        let err = config_homogeneous(&snap).unwrap_err();
        assert!(matches!(
            err,
            CheckError::EmptyInstanceSet { check: "config-homogeneous", .. }
        ));
    }
}

//! Two-step snapshot materialization.

use tracing::debug;

use fleetcheck_core::{GroupSnapshot, SnapshotError};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::FleetStateProvider;

/// Fetch a group and every member's instance description, then assemble a
/// fresh snapshot.
///
/// One `describe_instance` call is made per member, in member order, and
/// each description is paired with the member it was fetched for. A member
/// that disappeared between the two lookups surfaces as `InstanceNotFound`;
/// nothing is retried.
pub fn fetch_snapshot<P>(provider: &P, group: &str) -> ProviderResult<GroupSnapshot>
where
    P: FleetStateProvider + ?Sized,
{
    let description = provider.describe_group(group)?;
    debug!(
        group = %description.name,
        members = description.members.len(),
        desired = description.desired_capacity,
        "group described"
    );

    let details = description
        .members
        .iter()
        .map(|m| provider.describe_instance(&m.instance_id))
        .collect::<ProviderResult<Vec<_>>>()?;

    GroupSnapshot::assemble(description, details).map_err(|e| match e {
        SnapshotError::MissingInstance { instance, .. } => {
            ProviderError::InstanceNotFound(instance)
        }
    })
}

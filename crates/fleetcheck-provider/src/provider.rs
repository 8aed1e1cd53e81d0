//! The provider trait consumed by the check session.

use fleetcheck_core::{GroupDescription, InstanceDescription, ScheduledAction};

use crate::error::ProviderResult;

/// Source of raw fleet state.
///
/// Implementations own all I/O, credentials and retries. Every call returns
/// an already-materialized value; the validation core never blocks on a
/// provider.
pub trait FleetStateProvider {
    /// Check the credentials the provider was constructed with.
    fn validate_credentials(&self) -> ProviderResult<()>;

    /// Look up a scaling group by name.
    fn describe_group(&self, name: &str) -> ProviderResult<GroupDescription>;

    /// Look up launch time and configuration of one instance.
    fn describe_instance(&self, instance_id: &str) -> ProviderResult<InstanceDescription>;

    /// Scheduled actions registered for a group. An empty list is not an error.
    fn describe_scheduled_actions(&self, group: &str) -> ProviderResult<Vec<ScheduledAction>>;
}

impl<P: FleetStateProvider + ?Sized> FleetStateProvider for &P {
    fn validate_credentials(&self) -> ProviderResult<()> {
        (**self).validate_credentials()
    }

    fn describe_group(&self, name: &str) -> ProviderResult<GroupDescription> {
        (**self).describe_group(name)
    }

    fn describe_instance(&self, instance_id: &str) -> ProviderResult<InstanceDescription> {
        (**self).describe_instance(instance_id)
    }

    fn describe_scheduled_actions(&self, group: &str) -> ProviderResult<Vec<ScheduledAction>> {
        (**self).describe_scheduled_actions(group)
    }
}

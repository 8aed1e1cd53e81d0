//! MemoryProvider — fleet state held in plain maps.
//!
//! Used directly by tests and as the backing store of
//! [`FixtureProvider`](crate::FixtureProvider).

use std::collections::{HashMap, HashSet};

use tracing::debug;

use fleetcheck_core::{
    Credentials, GroupDescription, InstanceDescription, ScheduledAction,
};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::FleetStateProvider;

/// In-memory fleet state.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    credentials: Credentials,
    /// Access key ids accepted by `validate_credentials`. Empty accepts any
    /// non-empty key pair.
    authorized_keys: HashSet<String>,
    groups: HashMap<String, GroupDescription>,
    instances: HashMap<String, InstanceDescription>,
    /// Kept in insertion order; the aggregators break ties by it.
    actions: Vec<ScheduledAction>,
}

impl MemoryProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            authorized_keys: HashSet::new(),
            groups: HashMap::new(),
            instances: HashMap::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_authorized_key(mut self, access_key_id: &str) -> Self {
        self.authorized_keys.insert(access_key_id.to_string());
        self
    }

    pub fn with_group(mut self, group: GroupDescription) -> Self {
        self.insert_group(group);
        self
    }

    pub fn with_instance(mut self, instance: InstanceDescription) -> Self {
        self.insert_instance(instance);
        self
    }

    pub fn with_action(mut self, action: ScheduledAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn insert_group(&mut self, group: GroupDescription) {
        self.groups.insert(group.name.clone(), group);
    }

    pub fn insert_instance(&mut self, instance: InstanceDescription) {
        self.instances.insert(instance.instance_id.clone(), instance);
    }

    /// Remove an instance description, simulating a member that vanished
    /// between the group lookup and the instance lookup.
    pub fn remove_instance(&mut self, instance_id: &str) -> Option<InstanceDescription> {
        self.instances.remove(instance_id)
    }
}

impl FleetStateProvider for MemoryProvider {
    fn validate_credentials(&self) -> ProviderResult<()> {
        let creds = &self.credentials;
        if creds.access_key_id.is_empty() || creds.secret_access_key.is_empty() {
            return Err(ProviderError::Credential(
                "access key id and secret must both be set".to_string(),
            ));
        }
        if !self.authorized_keys.is_empty() && !self.authorized_keys.contains(&creds.access_key_id)
        {
            return Err(ProviderError::Credential(format!(
                "access key {} is not authorized",
                creds.access_key_id
            )));
        }
        debug!(region = %creds.region, "credentials accepted");
        Ok(())
    }

    fn describe_group(&self, name: &str) -> ProviderResult<GroupDescription> {
        self.groups
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::GroupNotFound(name.to_string()))
    }

    fn describe_instance(&self, instance_id: &str) -> ProviderResult<InstanceDescription> {
        self.instances
            .get(instance_id)
            .cloned()
            .ok_or_else(|| ProviderError::InstanceNotFound(instance_id.to_string()))
    }

    fn describe_scheduled_actions(&self, group: &str) -> ProviderResult<Vec<ScheduledAction>> {
        Ok(self
            .actions
            .iter()
            .filter(|a| a.group_name == group)
            .cloned()
            .collect())
    }
}

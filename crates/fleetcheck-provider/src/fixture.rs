//! FixtureProvider — fleet state loaded from a JSON document.
//!
//! The document mirrors what the provider calls would return:
//!
//! ```json
//! {
//!   "authorized_keys": ["AKIA..."],
//!   "groups": [{ "name": "web", "desired_capacity": 2,
//!                "availability_zones": ["ap-south-1a", "ap-south-1b"],
//!                "members": [{ "instance_id": "i-1",
//!                              "lifecycle_state": "InService",
//!                              "availability_zone": "ap-south-1a" }] }],
//!   "instances": [{ "instance_id": "i-1",
//!                   "launch_time": "2026-10-19T08:00:00Z",
//!                   "vpc_id": "vpc-1", "security_groups": ["sg-1"],
//!                   "image_id": "ami-1" }],
//!   "scheduled_actions": [{ "group_name": "web",
//!                           "start_time": "2026-10-19T18:00:00Z" }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use fleetcheck_core::{
    Credentials, GroupDescription, InstanceDescription, ScheduledAction,
};

use crate::error::{ProviderError, ProviderResult};
use crate::memory::MemoryProvider;
use crate::provider::FleetStateProvider;

/// Convert any `Display` error into a `ProviderError` variant.
macro_rules! map_err {
    ($variant:ident) => {
        |e| ProviderError::$variant(e.to_string())
    };
}

/// On-disk fleet document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetDocument {
    #[serde(default)]
    pub authorized_keys: Vec<String>,
    #[serde(default)]
    pub groups: Vec<GroupDescription>,
    #[serde(default)]
    pub instances: Vec<InstanceDescription>,
    #[serde(default)]
    pub scheduled_actions: Vec<ScheduledAction>,
}

impl FleetDocument {
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        serde_json::from_str(json).map_err(map_err!(Deserialize))
    }
}

/// Provider backed by a [`FleetDocument`].
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    inner: MemoryProvider,
}

impl FixtureProvider {
    /// Load a fleet document from disk.
    pub fn open(path: &Path, credentials: Credentials) -> ProviderResult<Self> {
        let content = std::fs::read_to_string(path).map_err(map_err!(Read))?;
        let doc = FleetDocument::from_json(&content)?;
        debug!(
            ?path,
            groups = doc.groups.len(),
            instances = doc.instances.len(),
            "fleet document loaded"
        );
        Ok(Self::from_document(doc, credentials))
    }

    pub fn from_document(doc: FleetDocument, credentials: Credentials) -> Self {
        let mut inner = MemoryProvider::new(credentials);
        for key in &doc.authorized_keys {
            inner = inner.with_authorized_key(key);
        }
        for group in doc.groups {
            inner.insert_group(group);
        }
        for instance in doc.instances {
            inner.insert_instance(instance);
        }
        for action in doc.scheduled_actions {
            inner = inner.with_action(action);
        }
        Self { inner }
    }
}

impl FleetStateProvider for FixtureProvider {
    fn validate_credentials(&self) -> ProviderResult<()> {
        self.inner.validate_credentials()
    }

    fn describe_group(&self, name: &str) -> ProviderResult<GroupDescription> {
        self.inner.describe_group(name)
    }

    fn describe_instance(&self, instance_id: &str) -> ProviderResult<InstanceDescription> {
        self.inner.describe_instance(instance_id)
    }

    fn describe_scheduled_actions(&self, group: &str) -> ProviderResult<Vec<ScheduledAction>> {
        self.inner.describe_scheduled_actions(group)
    }
}

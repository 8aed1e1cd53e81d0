//! fleetcheck.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default environment variable holding the access key id.
pub const DEFAULT_ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
/// Default environment variable holding the secret access key.
pub const DEFAULT_SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const DEFAULT_REGION: &str = "ap-south-1";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetcheckConfig {
    pub provider: Option<ProviderConfig>,
    pub credentials: Option<CredentialsConfig>,
    pub run: Option<RunConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Path to a JSON fleet document.
    pub fixture: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub access_key_id_env: Option<String>,
    pub secret_access_key_env: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    pub stop_on_failure: Option<bool>,
    /// Output format: "text" or "json".
    pub format: Option<String>,
}

impl FleetcheckConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FleetcheckConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn fixture_path(&self) -> Option<&str> {
        self.provider.as_ref()?.fixture.as_deref()
    }

    pub fn stop_on_failure(&self) -> bool {
        self.run
            .as_ref()
            .and_then(|r| r.stop_on_failure)
            .unwrap_or(false)
    }

    pub fn format(&self) -> Option<&str> {
        self.run.as_ref()?.format.as_deref()
    }

    /// Resolve credentials from the process environment.
    pub fn credentials_from_env(&self) -> anyhow::Result<Credentials> {
        self.resolve_credentials(|key| std::env::var(key).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    pub fn resolve_credentials<F>(&self, lookup: F) -> anyhow::Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cfg = self.credentials.clone().unwrap_or_default();
        let key_env = cfg
            .access_key_id_env
            .unwrap_or_else(|| DEFAULT_ACCESS_KEY_ENV.to_string());
        let secret_env = cfg
            .secret_access_key_env
            .unwrap_or_else(|| DEFAULT_SECRET_KEY_ENV.to_string());

        let access_key_id = lookup(&key_env)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("environment variable {key_env} is not set"))?;
        let secret_access_key = lookup(&secret_env)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("environment variable {secret_env} is not set"))?;

        Ok(Credentials {
            access_key_id,
            secret_access_key,
            region: cfg.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }
}

/// Access credentials handed to a provider at construction time.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl Credentials {
    pub fn new(access_key_id: &str, secret_access_key: &str, region: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            region: region.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

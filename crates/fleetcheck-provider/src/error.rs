//! Error types for fleet state providers.

use thiserror::Error;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors a provider can surface to the caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid credentials: {0}")]
    Credential(String),

    #[error("scaling group not found: {0}")]
    GroupNotFound(String),

    #[error("instance not found: {0}")]
    InstanceNotFound(String),

    #[error("failed to read fleet document: {0}")]
    Read(String),

    #[error("failed to parse fleet document: {0}")]
    Deserialize(String),
}

impl ProviderError {
    /// Whether this error means a named group or instance does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProviderError::GroupNotFound(_) | ProviderError::InstanceNotFound(_)
        )
    }
}

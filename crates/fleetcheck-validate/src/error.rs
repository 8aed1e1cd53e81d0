//! Check error types.

use serde::Serialize;
use thiserror::Error;

use fleetcheck_provider::ProviderError;

use crate::scenario::Step;

/// Result type alias for validators, aggregators and sessions.
pub type CheckResult<T> = Result<T, CheckError>;

/// Errors raised by the validation core or passed through from a provider.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A check that needs at least one in-service instance got none.
    #[error("{check}: group {group} has no in-service instances")]
    EmptyInstanceSet { check: &'static str, group: String },

    /// A named consistency rule did not hold.
    #[error("{step} failed: {detail}")]
    ValidationFailed { step: Step, detail: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Coarse classification of a [`CheckError`], used for reporting and exit
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Credential,
    NotFound,
    EmptyInstanceSet,
    ValidationFailed,
    Provider,
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::EmptyInstanceSet { .. } => ErrorKind::EmptyInstanceSet,
            CheckError::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            CheckError::Provider(ProviderError::Credential(_)) => ErrorKind::Credential,
            CheckError::Provider(e) if e.is_not_found() => ErrorKind::NotFound,
            CheckError::Provider(_) => ErrorKind::Provider,
        }
    }
}

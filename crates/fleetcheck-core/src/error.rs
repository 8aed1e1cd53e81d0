//! Error types for snapshot assembly.

use thiserror::Error;

/// Result type alias for snapshot assembly.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors raised while joining raw provider responses into a snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// A group member has no matching instance description.
    #[error("instance {instance} listed in group {group} has no description")]
    MissingInstance { group: String, instance: String },
}

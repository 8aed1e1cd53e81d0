//! fleetcheck-provider — the Fleet State Provider seam.
//!
//! The validation core never talks to a cloud API. It consumes whatever a
//! [`FleetStateProvider`] hands back: a group description, one instance
//! description per member, and the group's scheduled actions.
//!
//! # Providers
//!
//! ```text
//! FleetStateProvider
//!   ├── MemoryProvider   (builder-style, tests and embedding)
//!   └── FixtureProvider  (JSON fleet document on disk)
//! ```
//!
//! [`fetch_snapshot`] performs the two-step fetch and assembles a fresh
//! [`GroupSnapshot`](fleetcheck_core::GroupSnapshot) for one run.

pub mod error;
pub mod fixture;
pub mod memory;
pub mod provider;
pub mod snapshot;

pub use error::{ProviderError, ProviderResult};
pub use fixture::{FixtureProvider, FleetDocument};
pub use memory::MemoryProvider;
pub use provider::FleetStateProvider;
pub use snapshot::fetch_snapshot;

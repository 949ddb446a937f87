//! Service discovery.
//!
//! Components advertise what they offer (HTTP endpoints, message sources,
//! request/reply services) in a `Registry` and find each other by name.

pub mod backend;
pub mod record;
pub mod registry;

pub use backend::{DiscoveryBackend, InMemoryBackend};
pub use record::{Record, RecordKind, RegistryHandle};
pub use registry::Registry;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("lookup failed: {0}")]
    LookupFailed(String),

    #[error("publication failed: {0}")]
    PublishFailed(String),

    #[error("no {kind} named '{name}' is published")]
    NotFound { name: String, kind: RecordKind },

    #[error("unpublication failed: {0}")]
    UnpublishFailed(String),

    #[error("{failed} of {total} records could not be unpublished")]
    TeardownFailed { failed: usize, total: usize },

    #[error("discovery backend unavailable: {0}")]
    Unavailable(String),

    #[error("record '{0}' does not point to a usable location")]
    BadLocation(String),
}

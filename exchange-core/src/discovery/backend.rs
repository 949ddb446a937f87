use super::record::{Record, RecordKind, RegistryHandle};
use super::DiscoveryError;
use crate::sync::lock;
use async_trait::async_trait;
use std::sync::Mutex;

/// Storage behind a `Registry`.
///
/// Implementations may be remote; every call can therefore fail with
/// `DiscoveryError::Unavailable`.
#[async_trait]
pub trait DiscoveryBackend: Send + Sync {
    async fn store(&self, handle: RegistryHandle, record: Record) -> Result<(), DiscoveryError>;

    /// First record with this name and kind, in publication order.
    async fn find(&self, name: &str, kind: RecordKind) -> Result<Option<Record>, DiscoveryError>;

    /// Returns the removed record, or `None` if the handle was unknown.
    async fn remove(&self, handle: RegistryHandle) -> Result<Option<Record>, DiscoveryError>;

    async fn list(&self) -> Result<Vec<Record>, DiscoveryError>;
}

/// Process-local backend keeping records in publication order.
#[derive(Default)]
pub struct InMemoryBackend {
    entries: Mutex<Vec<(RegistryHandle, Record)>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiscoveryBackend for InMemoryBackend {
    async fn store(&self, handle: RegistryHandle, record: Record) -> Result<(), DiscoveryError> {
        lock(&self.entries).push((handle, record));
        Ok(())
    }

    async fn find(&self, name: &str, kind: RecordKind) -> Result<Option<Record>, DiscoveryError> {
        Ok(lock(&self.entries)
            .iter()
            .find(|(_, r)| r.name == name && r.kind == kind)
            .map(|(_, r)| r.clone()))
    }

    async fn remove(&self, handle: RegistryHandle) -> Result<Option<Record>, DiscoveryError> {
        let mut entries = lock(&self.entries);
        Ok(entries
            .iter()
            .position(|(h, _)| *h == handle)
            .map(|idx| entries.remove(idx).1))
    }

    async fn list(&self) -> Result<Vec<Record>, DiscoveryError> {
        Ok(lock(&self.entries).iter().map(|(_, r)| r.clone()).collect())
    }
}

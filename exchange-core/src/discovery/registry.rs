use super::backend::{DiscoveryBackend, InMemoryBackend};
use super::record::{Record, RecordKind, RegistryHandle};
use super::DiscoveryError;
use log::{debug, info};
use std::sync::Arc;

/// Table of published capabilities.
///
/// A `Registry` is an ordinary value: build one, then hand clones to the
/// components that need it. Clones share the same backend.
#[derive(Clone)]
pub struct Registry {
    backend: Arc<dyn DiscoveryBackend>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Registry {
    pub fn new(backend: Arc<dyn DiscoveryBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBackend::new()))
    }

    /// Advertises a record.
    ///
    /// # Returns
    ///
    /// * `Ok(RegistryHandle)` identifying this publication.
    /// * `Err(DiscoveryError::PublishFailed)` if the backend refused it.
    pub async fn publish(&self, record: Record) -> Result<RegistryHandle, DiscoveryError> {
        let handle = RegistryHandle::new();
        let description = record.to_string();
        self.backend
            .store(handle, record)
            .await
            .map_err(|e| DiscoveryError::PublishFailed(format!("{}: {}", description, e)))?;
        info!("Published {}", description);
        Ok(handle)
    }

    /// Finds a record by name and kind.
    ///
    /// # Returns
    ///
    /// * `Err(DiscoveryError::NotFound)` if nothing matches.
    /// * `Err(DiscoveryError::LookupFailed)` if the backend could not answer.
    pub async fn lookup(&self, name: &str, kind: RecordKind) -> Result<Record, DiscoveryError> {
        self.backend
            .find(name, kind)
            .await
            .map_err(|e| DiscoveryError::LookupFailed(format!("{} '{}': {}", kind, name, e)))?
            .ok_or_else(|| DiscoveryError::NotFound {
                name: name.to_string(),
                kind,
            })
    }

    /// Withdraws a record. Unknown or already withdrawn handles are a no-op.
    pub async fn unpublish(&self, handle: RegistryHandle) -> Result<(), DiscoveryError> {
        let removed = self
            .backend
            .remove(handle)
            .await
            .map_err(|e| DiscoveryError::UnpublishFailed(format!("{}: {}", handle, e)))?;
        match removed {
            Some(record) => info!("Unpublished {}", record),
            None => debug!("Handle {} was not published, nothing to do", handle),
        }
        Ok(())
    }

    /// Every record currently published, in publication order.
    pub async fn records(&self) -> Result<Vec<Record>, DiscoveryError> {
        self.backend
            .list()
            .await
            .map_err(|e| DiscoveryError::LookupFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_then_lookup() {
        let registry = Registry::in_memory();
        registry
            .publish(Record::message_source("market-data", "market"))
            .await
            .unwrap();

        let record = registry
            .lookup("market-data", RecordKind::MessageSource)
            .await
            .unwrap();
        assert_eq!(record.location.as_bus(), Some("market"));

        // Same name, other kind.
        assert!(matches!(
            registry.lookup("market-data", RecordKind::Service).await,
            Err(DiscoveryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unpublish_twice_is_a_no_op() {
        let registry = Registry::in_memory();
        let handle = registry
            .publish(Record::service("portfolio", "service.portfolio"))
            .await
            .unwrap();

        registry.unpublish(handle).await.unwrap();
        registry.unpublish(handle).await.unwrap();
        assert!(registry.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_returns_first_published() {
        let registry = Registry::in_memory();
        let first = registry
            .publish(Record::http_endpoint("quotes", "localhost", 8080, "/"))
            .await
            .unwrap();
        registry
            .publish(Record::http_endpoint("quotes", "localhost", 9090, "/"))
            .await
            .unwrap();

        let record = registry.lookup("quotes", RecordKind::HttpEndpoint).await.unwrap();
        assert_eq!(record.location.url().as_deref(), Some("http://localhost:8080/"));

        registry.unpublish(first).await.unwrap();
        let record = registry.lookup("quotes", RecordKind::HttpEndpoint).await.unwrap();
        assert_eq!(record.location.url().as_deref(), Some("http://localhost:9090/"));
    }
}

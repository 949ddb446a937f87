use async_trait::async_trait;
use exchange_core::discovery::{DiscoveryBackend, InMemoryBackend};
use exchange_core::{Bus, DiscoveryError, Microservice, Record, RecordKind, Registry, RegistryHandle};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Backend refusing to withdraw records with a given name.
struct StickyBackend {
    inner: InMemoryBackend,
    sticky_name: String,
    sticky: Mutex<HashSet<RegistryHandle>>,
}

#[async_trait]
impl DiscoveryBackend for StickyBackend {
    async fn store(&self, handle: RegistryHandle, record: Record) -> Result<(), DiscoveryError> {
        if record.name == self.sticky_name {
            self.sticky.lock().unwrap().insert(handle);
        }
        self.inner.store(handle, record).await
    }

    async fn find(&self, name: &str, kind: RecordKind) -> Result<Option<Record>, DiscoveryError> {
        self.inner.find(name, kind).await
    }

    async fn remove(&self, handle: RegistryHandle) -> Result<Option<Record>, DiscoveryError> {
        if self.sticky.lock().unwrap().contains(&handle) {
            return Err(DiscoveryError::Unavailable("backend went away".to_string()));
        }
        self.inner.remove(handle).await
    }

    async fn list(&self) -> Result<Vec<Record>, DiscoveryError> {
        self.inner.list().await
    }
}

/// Backend whose writes take a while to land.
struct SlowBackend {
    inner: InMemoryBackend,
    delay: Duration,
}

#[async_trait]
impl DiscoveryBackend for SlowBackend {
    async fn store(&self, handle: RegistryHandle, record: Record) -> Result<(), DiscoveryError> {
        tokio::time::sleep(self.delay).await;
        self.inner.store(handle, record).await
    }

    async fn find(&self, name: &str, kind: RecordKind) -> Result<Option<Record>, DiscoveryError> {
        self.inner.find(name, kind).await
    }

    async fn remove(&self, handle: RegistryHandle) -> Result<Option<Record>, DiscoveryError> {
        self.inner.remove(handle).await
    }

    async fn list(&self) -> Result<Vec<Record>, DiscoveryError> {
        self.inner.list().await
    }
}

/// Backend that is down for publication.
struct DownBackend;

#[async_trait]
impl DiscoveryBackend for DownBackend {
    async fn store(&self, _: RegistryHandle, _: Record) -> Result<(), DiscoveryError> {
        Err(DiscoveryError::Unavailable("connection refused".to_string()))
    }

    async fn find(&self, _: &str, _: RecordKind) -> Result<Option<Record>, DiscoveryError> {
        Err(DiscoveryError::Unavailable("connection refused".to_string()))
    }

    async fn remove(&self, _: RegistryHandle) -> Result<Option<Record>, DiscoveryError> {
        Err(DiscoveryError::Unavailable("connection refused".to_string()))
    }

    async fn list(&self) -> Result<Vec<Record>, DiscoveryError> {
        Err(DiscoveryError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_teardown_withdraws_every_record() {
    let registry = Registry::in_memory();
    let other = Microservice::new("other", Bus::new(), registry.clone());
    other.publish_message_source("elsewhere", "elsewhere").await.unwrap();

    let component = Microservice::new("component", Bus::new(), registry.clone());
    component
        .publish_http_endpoint("quotes", "localhost", 8080, "/")
        .await
        .unwrap();
    component.publish_message_source("market-data", "market").await.unwrap();
    component.publish_service("portfolio", "service.portfolio").await.unwrap();
    assert_eq!(component.published_count(), 3);

    component.stop().await.unwrap();

    assert_eq!(component.published_count(), 0);
    assert!(component.is_closed());
    let remaining = registry.records().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "elsewhere");

    // Second stop has nothing left to do.
    component.stop().await.unwrap();
}

#[tokio::test]
async fn test_teardown_reports_failure_without_skipping_others() {
    let backend = Arc::new(StickyBackend {
        inner: InMemoryBackend::new(),
        sticky_name: "portfolio".to_string(),
        sticky: Mutex::new(HashSet::new()),
    });
    let registry = Registry::new(backend);
    let component = Microservice::new("component", Bus::new(), registry.clone());
    component.publish_message_source("market-data", "market").await.unwrap();
    component.publish_service("portfolio", "service.portfolio").await.unwrap();
    component
        .publish_http_endpoint("quotes", "localhost", 8080, "/")
        .await
        .unwrap();

    let err = component.stop().await.unwrap_err();
    assert!(matches!(
        err,
        DiscoveryError::TeardownFailed { failed: 1, total: 3 }
    ));
    assert_eq!(component.published_count(), 0);
    assert!(component.is_closed());

    let remaining = registry.records().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "portfolio");
}

#[tokio::test]
async fn test_unavailable_backend() {
    let registry = Registry::new(Arc::new(DownBackend));
    let component = Microservice::new("component", Bus::new(), registry.clone());

    assert!(matches!(
        component.publish_service("portfolio", "service.portfolio").await,
        Err(DiscoveryError::PublishFailed(_))
    ));
    assert_eq!(component.published_count(), 0);
    assert!(matches!(
        registry.lookup("portfolio", RecordKind::Service).await,
        Err(DiscoveryError::LookupFailed(_))
    ));
    component.stop().await.unwrap();
}

#[tokio::test]
async fn test_publish_racing_stop_leaves_nothing_behind() {
    let registry = Registry::new(Arc::new(SlowBackend {
        inner: InMemoryBackend::new(),
        delay: Duration::from_millis(50),
    }));
    let component = Arc::new(Microservice::new("component", Bus::new(), registry.clone()));

    let publishing = {
        let component = component.clone();
        tokio::spawn(async move { component.publish_service("late", "service.late").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    component.stop().await.unwrap();

    let outcome = publishing.await.unwrap();
    assert!(matches!(outcome, Err(DiscoveryError::PublishFailed(_))));
    assert!(component.is_closed());
    assert_eq!(component.published_count(), 0);
    assert!(registry.records().await.unwrap().is_empty());
}

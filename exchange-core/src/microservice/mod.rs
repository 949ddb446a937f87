//! Publication lifecycle shared by every component.
//!
//! A component owns one `Microservice`. It publishes through it, discovers its
//! collaborators through it and calls `stop` on shutdown, which withdraws
//! everything the component advertised.

use crate::bus::{Bus, BusMessage, MessageReceiver, ServiceClient};
use crate::discovery::{DiscoveryError, Record, RecordKind, Registry, RegistryHandle};
use crate::sync::lock;
use futures::future::join_all;
use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub struct Microservice {
    name: String,
    bus: Bus,
    registry: Registry,
    published: Mutex<Vec<RegistryHandle>>,
    closed: AtomicBool,
}

impl Microservice {
    /// Creates a new microservice instance.
    ///
    /// # Arguments
    ///
    /// * `name` - Component name, used in logs.
    /// * `bus` - Bus shared by every component.
    /// * `registry` - Registry used for publication and discovery.
    pub fn new(name: &str, bus: Bus, registry: Registry) -> Self {
        Self {
            name: name.to_string(),
            bus,
            registry,
            published: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether `stop` has been called. A stopped component publishes nothing.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of records this component currently has published.
    pub fn published_count(&self) -> usize {
        lock(&self.published).len()
    }

    /// Publishes a record and remembers its handle for teardown.
    ///
    /// Fails with `DiscoveryError::PublishFailed` once `stop` has been called,
    /// including when `stop` runs while the record is being stored. The
    /// record is withdrawn again in that case.
    pub async fn publish(&self, record: Record) -> Result<RegistryHandle, DiscoveryError> {
        if self.is_closed() {
            return Err(self.stopped());
        }
        let handle = self.registry.publish(record).await?;
        {
            // `stop` flips `closed` under this lock before draining.
            let mut published = lock(&self.published);
            if !self.is_closed() {
                published.push(handle);
                return Ok(handle);
            }
        }

        warn!("{}: stopped during publication, withdrawing {}", self.name, handle);
        if let Err(e) = self.registry.unpublish(handle).await {
            error!("{}: {}", self.name, e);
        }
        Err(self.stopped())
    }

    fn stopped(&self) -> DiscoveryError {
        DiscoveryError::PublishFailed(format!("{} is stopped", self.name))
    }

    pub async fn publish_http_endpoint(
        &self,
        name: &str,
        host: &str,
        port: u16,
        root: &str,
    ) -> Result<RegistryHandle, DiscoveryError> {
        self.publish(Record::http_endpoint(name, host, port, root))
            .await
    }

    pub async fn publish_message_source(
        &self,
        name: &str,
        topic: &str,
    ) -> Result<RegistryHandle, DiscoveryError> {
        self.publish(Record::message_source(name, topic)).await
    }

    pub async fn publish_service(
        &self,
        name: &str,
        address: &str,
    ) -> Result<RegistryHandle, DiscoveryError> {
        self.publish(Record::service(name, address)).await
    }

    /// Withdraws one of this component's records.
    ///
    /// The handle stays tracked if the registry fails, so `stop` retries it.
    pub async fn unpublish(&self, handle: RegistryHandle) -> Result<(), DiscoveryError> {
        self.registry.unpublish(handle).await?;
        lock(&self.published).retain(|h| *h != handle);
        Ok(())
    }

    /// Subscribes to the topic behind a published message source.
    pub async fn message_source<T: BusMessage>(
        &self,
        name: &str,
    ) -> Result<MessageReceiver<T>, DiscoveryError> {
        let record = self.registry.lookup(name, RecordKind::MessageSource).await?;
        let topic = record
            .location
            .as_bus()
            .ok_or_else(|| DiscoveryError::BadLocation(name.to_string()))?;
        Ok(self.bus.receiver(topic))
    }

    /// Resolves a published request/reply service.
    pub async fn service_client<Req: BusMessage, Resp: BusMessage>(
        &self,
        name: &str,
    ) -> Result<ServiceClient<Req, Resp>, DiscoveryError> {
        let record = self.registry.lookup(name, RecordKind::Service).await?;
        let address = record
            .location
            .as_bus()
            .ok_or_else(|| DiscoveryError::BadLocation(name.to_string()))?;
        Ok(self.bus.client(address))
    }

    /// Base URL of a published HTTP endpoint.
    pub async fn http_endpoint(&self, name: &str) -> Result<String, DiscoveryError> {
        let record = self.registry.lookup(name, RecordKind::HttpEndpoint).await?;
        record
            .location
            .url()
            .ok_or_else(|| DiscoveryError::BadLocation(name.to_string()))
    }

    /// Withdraws every record this component published, then releases the
    /// registry connection.
    ///
    /// Unpublications run concurrently and all of them are awaited even if
    /// some fail. Failures are logged and reported as one
    /// `DiscoveryError::TeardownFailed`. Calling `stop` again is a no-op.
    pub async fn stop(&self) -> Result<(), DiscoveryError> {
        let (first_stop, handles) = {
            let mut published = lock(&self.published);
            let first_stop = !self.closed.swap(true, Ordering::SeqCst);
            (first_stop, published.drain(..).collect::<Vec<RegistryHandle>>())
        };
        let total = handles.len();

        let tasks = handles.into_iter().map(|handle| {
            let registry = self.registry.clone();
            tokio::spawn(async move { registry.unpublish(handle).await })
        });
        let mut failed = 0;
        for outcome in join_all(tasks).await {
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failed += 1;
                    error!("{}: {}", self.name, e);
                }
                Err(e) => {
                    failed += 1;
                    error!("{}: unpublish task failed: {}", self.name, e);
                }
            }
        }

        if first_stop {
            info!("{} stopped ({} records withdrawn)", self.name, total - failed);
        }
        if failed > 0 {
            return Err(DiscoveryError::TeardownFailed { failed, total });
        }
        Ok(())
    }
}

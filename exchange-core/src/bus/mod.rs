//! In-process message bus.
//!
//! Two interaction styles are offered:
//!
//! * publish/subscribe on named topics (`sender` / `receiver`), fire and
//!   forget, every subscriber gets a copy;
//! * request/reply on named service addresses (`bind` / `client`).

pub mod address;
pub mod memory;
pub mod message;
pub mod rpc;
pub mod socket;
pub mod transport;

pub use address::Address;
pub use message::BusMessage;
pub use rpc::{Responder, ServiceClient, ServiceEndpoint};
pub use socket::{MessageReceiver, MessageSender};

use exchange::InvalidMessage;
use memory::MemoryTransport;
use rpc::ServiceTable;
use std::sync::Arc;
use thiserror::Error;
use transport::Transport;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] InvalidMessage),

    #[error("channel '{0}' is closed")]
    Closed(String),

    #[error("no service bound at '{0}'")]
    NoHandler(String),

    #[error("a service is already bound at '{0}'")]
    AlreadyBound(String),

    #[error("service at '{0}' did not reply")]
    NoReply(String),
}

/// Shared handle on the bus. Cloning is cheap and every clone talks to the
/// same topics and services.
#[derive(Clone)]
pub struct Bus {
    transport: Arc<dyn Transport>,
    services: ServiceTable,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Creates a bus backed by in-process channels.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(MemoryTransport::new()))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            services: ServiceTable::default(),
        }
    }

    pub fn sender<T: BusMessage>(&self, topic: &str) -> MessageSender<T> {
        MessageSender::new(topic, self.transport.output(topic))
    }

    /// Subscribes to `topic`. Only messages published after this call are
    /// delivered.
    pub fn receiver<T: BusMessage>(&self, topic: &str) -> MessageReceiver<T> {
        MessageReceiver::new(topic, self.transport.input(topic))
    }

    /// One-shot publish, for callers that do not keep a sender around.
    pub fn publish<T: BusMessage>(&self, topic: &str, message: &T) -> Result<usize, BusError> {
        self.sender(topic).send(message)
    }

    /// Binds a request/reply service at `address`.
    pub fn bind<Req: BusMessage, Resp: BusMessage>(
        &self,
        address: &str,
    ) -> Result<ServiceEndpoint<Req, Resp>, BusError> {
        ServiceEndpoint::bind(&self.services, address)
    }

    pub fn client<Req: BusMessage, Resp: BusMessage>(&self, address: &str) -> ServiceClient<Req, Resp> {
        ServiceClient::new(&self.services, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_request_reply() {
        let bus = Bus::new();
        let mut endpoint = bus.bind::<Value, Value>("service.echo").unwrap();
        tokio::spawn(async move {
            while let Some((request, responder)) = endpoint.next().await {
                responder.reply(&json!({ "echo": request })).unwrap();
            }
        });

        let client = bus.client::<Value, Value>("service.echo");
        let reply = client.request(&json!(42)).await.unwrap();
        assert_eq!(reply, json!({ "echo": 42 }));
    }

    #[tokio::test]
    async fn test_request_without_handler() {
        let bus = Bus::new();
        let client = bus.client::<Value, Value>("service.none");
        assert!(matches!(
            client.request(&json!(1)).await,
            Err(BusError::NoHandler(_))
        ));
    }

    #[tokio::test]
    async fn test_bind_twice_and_rebind_after_drop() {
        let bus = Bus::new();
        let endpoint = bus.bind::<Value, Value>("service.once").unwrap();
        assert!(matches!(
            bus.bind::<Value, Value>("service.once"),
            Err(BusError::AlreadyBound(_))
        ));

        drop(endpoint);
        assert!(bus.bind::<Value, Value>("service.once").is_ok());
    }

    #[tokio::test]
    async fn test_publish_reaches_clone_subscribers() {
        let bus = Bus::new();
        let other = bus.clone();
        let mut receiver = other.receiver::<Value>("events");

        assert_eq!(bus.publish("events", &json!("hello")).unwrap(), 1);
        assert_eq!(receiver.recv().await.unwrap(), json!("hello"));
    }
}

//! Typed socket abstractions.
//!
//! Provides `MessageReceiver` and `MessageSender` which handle encoding and
//! validation automatically.

use super::message::{decode, encode, BusMessage};
use super::transport::{TransportInput, TransportOutput};
use super::BusError;
use log::warn;
use std::marker::PhantomData;

/// A strongly-typed subscription to one bus topic.
pub struct MessageReceiver<T> {
    topic: String,
    transport: Box<dyn TransportInput>,
    _marker: PhantomData<T>,
}

impl<T: BusMessage> MessageReceiver<T> {
    /// Creates a new MessageReceiver from a raw transport backend.
    pub fn new(topic: &str, transport: Box<dyn TransportInput>) -> Self {
        Self {
            topic: topic.to_string(),
            transport,
            _marker: PhantomData,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Receives the next valid message.
    ///
    /// Messages that fail to decode or validate are logged and skipped, so a
    /// single bad publisher cannot stop a consumer.
    ///
    /// # Returns
    ///
    /// * `Ok(T)` containing the decoded message.
    /// * `Err(BusError::Closed)` once the topic can no longer deliver.
    pub async fn recv(&mut self) -> Result<T, BusError> {
        loop {
            let bytes = self.transport.recv_bytes().await?;
            match decode(&bytes) {
                Ok(message) => return Ok(message),
                Err(e) => warn!("Skipping malformed message on '{}': {}", self.topic, e),
            }
        }
    }

    /// Returns the next valid message if one is already queued.
    pub fn try_recv(&mut self) -> Result<Option<T>, BusError> {
        while let Some(bytes) = self.transport.try_recv()? {
            match decode(&bytes) {
                Ok(message) => return Ok(Some(message)),
                Err(e) => warn!("Skipping malformed message on '{}': {}", self.topic, e),
            }
        }
        Ok(None)
    }
}

/// A strongly-typed publisher on one bus topic.
pub struct MessageSender<T> {
    topic: String,
    transport: Box<dyn TransportOutput>,
    _marker: PhantomData<T>,
}

impl<T: BusMessage> MessageSender<T> {
    pub fn new(topic: &str, transport: Box<dyn TransportOutput>) -> Self {
        Self {
            topic: topic.to_string(),
            transport,
            _marker: PhantomData,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Encodes and publishes the message.
    ///
    /// Does not wait for consumers. Returns how many subscribers were
    /// listening, which may be zero.
    pub fn send(&self, message: &T) -> Result<usize, BusError> {
        let bytes = encode(message)?;
        self.transport.send_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::memory::MemoryTransport;
    use crate::bus::transport::Transport;
    use exchange::Quote;

    #[tokio::test]
    async fn test_malformed_messages_are_skipped() {
        let transport = MemoryTransport::new();
        let mut receiver: MessageReceiver<Quote> =
            MessageReceiver::new("market", transport.input("market"));
        let raw = transport.output("market");
        let sender: MessageSender<Quote> = MessageSender::new("market", transport.output("market"));

        raw.send_bytes(b"garbage".to_vec()).unwrap();
        sender
            .send(&Quote::new("Acme", "ACM").with_prices(-5.0, 1.0))
            .unwrap();
        sender
            .send(&Quote::new("Acme", "ACM").with_prices(5.0, 6.0))
            .unwrap();

        let quote = receiver.recv().await.unwrap();
        assert_eq!(quote.bid, 5.0);
        assert!(receiver.try_recv().unwrap().is_none());
    }
}

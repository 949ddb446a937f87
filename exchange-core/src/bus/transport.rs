use super::BusError;
use async_trait::async_trait;

/// Abstraction for the incoming transport layer (reading raw bytes).
/// Implementation details (memory channels, brokers) are hidden behind this trait.
#[async_trait]
pub trait TransportInput: Send + Sync {
    /// Receive the next full message as bytes.
    async fn recv_bytes(&mut self) -> Result<Vec<u8>, BusError>;

    /// Receive the next message if one is already queued.
    fn try_recv(&mut self) -> Result<Option<Vec<u8>>, BusError>;
}

/// Abstraction for the outgoing transport layer (sending raw bytes).
pub trait TransportOutput: Send + Sync {
    /// Send a full message without waiting for consumers.
    ///
    /// Returns the number of subscribers the message was handed to.
    fn send_bytes(&self, data: Vec<u8>) -> Result<usize, BusError>;
}

/// A publish/subscribe transport addressed by topic name.
pub trait Transport: Send + Sync {
    /// Creates an output publishing on `topic`.
    fn output(&self, topic: &str) -> Box<dyn TransportOutput>;

    /// Creates an input receiving every message published on `topic` from
    /// now on.
    fn input(&self, topic: &str) -> Box<dyn TransportInput>;
}

use super::transport::{Transport, TransportInput, TransportOutput};
use super::BusError;
use crate::sync::lock;
use async_trait::async_trait;
use log::warn;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

const TOPIC_CAPACITY: usize = 1024;

/// In-process transport.
///
/// Every topic is backed by a Tokio broadcast channel, created lazily the
/// first time the topic is used from either side.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    topics: Arc<Mutex<HashMap<String, broadcast::Sender<Vec<u8>>>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, topic: &str) -> broadcast::Sender<Vec<u8>> {
        let mut topics = lock(&self.topics);
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .clone()
    }
}

impl Transport for MemoryTransport {
    fn output(&self, topic: &str) -> Box<dyn TransportOutput> {
        Box::new(MemoryTransportOutput {
            sender: self.channel(topic),
        })
    }

    fn input(&self, topic: &str) -> Box<dyn TransportInput> {
        Box::new(MemoryTransportInput {
            topic: topic.to_string(),
            receiver: self.channel(topic).subscribe(),
        })
    }
}

pub(crate) struct MemoryTransportInput {
    topic: String,
    receiver: broadcast::Receiver<Vec<u8>>,
}

#[async_trait]
impl TransportInput for MemoryTransportInput {
    async fn recv_bytes(&mut self) -> Result<Vec<u8>, BusError> {
        loop {
            match self.receiver.recv().await {
                Ok(bytes) => return Ok(bytes),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Subscriber of '{}' lagged, {} messages dropped", self.topic, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(BusError::Closed(self.topic.clone()))
                }
            }
        }
    }

    fn try_recv(&mut self) -> Result<Option<Vec<u8>>, BusError> {
        loop {
            match self.receiver.try_recv() {
                Ok(bytes) => return Ok(Some(bytes)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Subscriber of '{}' lagged, {} messages dropped", self.topic, skipped);
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(BusError::Closed(self.topic.clone()))
                }
            }
        }
    }
}

pub(crate) struct MemoryTransportOutput {
    sender: broadcast::Sender<Vec<u8>>,
}

impl TransportOutput for MemoryTransportOutput {
    fn send_bytes(&self, data: Vec<u8>) -> Result<usize, BusError> {
        // Publishing with nobody listening is not an error.
        Ok(self.sender.send(data).unwrap_or(0))
    }
}

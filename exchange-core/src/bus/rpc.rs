//! Request/reply on named bus addresses.
//!
//! A service binds an address and receives `(request, Responder)` pairs; any
//! number of `ServiceClient`s can send requests to that address and await the
//! single reply.

use super::message::{decode, encode, BusMessage};
use super::BusError;
use crate::sync::lock;
use log::{debug, warn};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

const SERVICE_QUEUE: usize = 256;

pub(crate) struct Envelope {
    payload: Vec<u8>,
    reply: oneshot::Sender<Vec<u8>>,
}

pub(crate) type ServiceTable = Arc<Mutex<HashMap<String, mpsc::Sender<Envelope>>>>;

/// The receiving side of a bound service address.
///
/// Dropping the endpoint unbinds the address.
pub struct ServiceEndpoint<Req, Resp> {
    address: String,
    table: ServiceTable,
    sender: mpsc::Sender<Envelope>,
    requests: mpsc::Receiver<Envelope>,
    _marker: PhantomData<fn(Req) -> Resp>,
}

impl<Req: BusMessage, Resp: BusMessage> ServiceEndpoint<Req, Resp> {
    pub(crate) fn bind(table: &ServiceTable, address: &str) -> Result<Self, BusError> {
        let mut services = lock(table);
        if services.get(address).is_some_and(|s| !s.is_closed()) {
            return Err(BusError::AlreadyBound(address.to_string()));
        }
        let (sender, requests) = mpsc::channel(SERVICE_QUEUE);
        services.insert(address.to_string(), sender.clone());
        debug!("Service bound at '{}'", address);
        Ok(Self {
            address: address.to_string(),
            table: table.clone(),
            sender,
            requests,
            _marker: PhantomData,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Waits for the next well-formed request.
    ///
    /// Malformed requests are logged and dropped; their caller gets
    /// `BusError::NoReply`. Returns `None` once the endpoint can no longer
    /// receive.
    pub async fn next(&mut self) -> Option<(Req, Responder<Resp>)> {
        loop {
            let envelope = self.requests.recv().await?;
            match decode::<Req>(&envelope.payload) {
                Ok(request) => {
                    return Some((
                        request,
                        Responder {
                            reply: envelope.reply,
                            _marker: PhantomData,
                        },
                    ))
                }
                Err(e) => warn!("Dropping malformed request on '{}': {}", self.address, e),
            }
        }
    }
}

impl<Req, Resp> Drop for ServiceEndpoint<Req, Resp> {
    fn drop(&mut self) {
        let mut services = lock(&self.table);
        // A later bind may already own the address.
        if services
            .get(&self.address)
            .is_some_and(|s| s.same_channel(&self.sender))
        {
            services.remove(&self.address);
            debug!("Service unbound from '{}'", self.address);
        }
    }
}

/// Sends exactly one reply to the caller of a request.
pub struct Responder<Resp> {
    reply: oneshot::Sender<Vec<u8>>,
    _marker: PhantomData<Resp>,
}

impl<Resp: BusMessage> Responder<Resp> {
    /// Fails only when the response cannot be encoded. A caller that gave
    /// up waiting is not an error.
    pub fn reply(self, response: &Resp) -> Result<(), BusError> {
        let bytes = encode(response)?;
        if self.reply.send(bytes).is_err() {
            debug!("Caller went away before the reply was sent");
        }
        Ok(())
    }
}

/// Sends requests to a service address.
pub struct ServiceClient<Req, Resp> {
    address: String,
    table: ServiceTable,
    _marker: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> Clone for ServiceClient<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            address: self.address.clone(),
            table: self.table.clone(),
            _marker: PhantomData,
        }
    }
}

impl<Req: BusMessage, Resp: BusMessage> ServiceClient<Req, Resp> {
    pub(crate) fn new(table: &ServiceTable, address: &str) -> Self {
        Self {
            address: address.to_string(),
            table: table.clone(),
            _marker: PhantomData,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sends one request and waits for its reply.
    ///
    /// # Returns
    ///
    /// * `Err(BusError::NoHandler)` if nothing is bound at the address.
    /// * `Err(BusError::NoReply)` if the service dropped the request.
    pub async fn request(&self, request: &Req) -> Result<Resp, BusError> {
        let payload = encode(request)?;
        let sender = lock(&self.table)
            .get(&self.address)
            .cloned()
            .ok_or_else(|| BusError::NoHandler(self.address.clone()))?;

        let (reply, response) = oneshot::channel();
        sender
            .send(Envelope { payload, reply })
            .await
            .map_err(|_| BusError::NoHandler(self.address.clone()))?;

        let bytes = response
            .await
            .map_err(|_| BusError::NoReply(self.address.clone()))?;
        decode(&bytes)
    }
}

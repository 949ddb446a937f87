//! Messages carried on the bus.
//!
//! Everything is encoded as JSON. Receivers decode and validate each message
//! before handing it to application code.

use super::BusError;
use exchange::{InvalidMessage, Quote, TradeEvent};
use serde::{de::DeserializeOwned, Serialize};

/// A payload that can travel on the bus.
pub trait BusMessage: Serialize + DeserializeOwned + Send + 'static {
    /// Checks the decoded message before it reaches a handler.
    fn validate(&self) -> Result<(), InvalidMessage> {
        Ok(())
    }
}

impl BusMessage for Quote {
    fn validate(&self) -> Result<(), InvalidMessage> {
        Quote::validate(self)
    }
}

impl BusMessage for TradeEvent {
    fn validate(&self) -> Result<(), InvalidMessage> {
        TradeEvent::validate(self)
    }
}

impl BusMessage for serde_json::Value {}

pub fn encode<T: BusMessage>(message: &T) -> Result<Vec<u8>, BusError> {
    Ok(serde_json::to_vec(message)?)
}

/// Decodes and validates one message.
pub fn decode<T: BusMessage>(bytes: &[u8]) -> Result<T, BusError> {
    let message: T = serde_json::from_slice(bytes)?;
    message.validate()?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_invalid_quote() {
        let quote = Quote::new("Acme", "ACM").with_prices(-1.0, 2.0);
        let bytes = serde_json::to_vec(&quote).unwrap();

        assert!(matches!(decode::<Quote>(&bytes), Err(BusError::Invalid(_))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode::<Quote>(b"{not json"), Err(BusError::Codec(_))));
    }

    #[test]
    fn test_decode_quote() {
        let quote = Quote::new("Acme", "ACM").with_prices(10.0, 11.0);
        let decoded: Quote = decode(&encode(&quote).unwrap()).unwrap();
        assert_eq!(decoded.company_name, "Acme");
    }
}

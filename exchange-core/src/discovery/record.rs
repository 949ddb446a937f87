use crate::bus::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What kind of capability a record advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    HttpEndpoint,
    MessageSource,
    Service,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            RecordKind::HttpEndpoint => "http-endpoint",
            RecordKind::MessageSource => "message-source",
            RecordKind::Service => "service",
        };
        f.write_str(tag)
    }
}

/// A capability advertised in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub kind: RecordKind,
    pub location: Address,
}

impl Record {
    pub fn new(name: &str, kind: RecordKind, location: Address) -> Self {
        Self {
            name: name.to_string(),
            kind,
            location,
        }
    }

    pub fn http_endpoint(name: &str, host: &str, port: u16, root: &str) -> Self {
        Self::new(name, RecordKind::HttpEndpoint, Address::http(host, port, root))
    }

    /// A pub/sub topic other components can subscribe to.
    pub fn message_source(name: &str, topic: &str) -> Self {
        Self::new(name, RecordKind::MessageSource, Address::bus(topic))
    }

    /// A request/reply service bound on the bus.
    pub fn service(name: &str, address: &str) -> Self {
        Self::new(name, RecordKind::Service, Address::bus(address))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.name, self.location)
    }
}

/// Opaque token returned by `publish`, needed to withdraw the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryHandle(Uuid);

impl RegistryHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RegistryHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_constructors() {
        let quotes = Record::http_endpoint("quotes", "localhost", 8080, "/");
        assert_eq!(quotes.kind, RecordKind::HttpEndpoint);
        assert_eq!(quotes.location.url().as_deref(), Some("http://localhost:8080/"));

        let market = Record::message_source("market-data", "market");
        assert_eq!(market.location.as_bus(), Some("market"));
        assert_eq!(market.to_string(), "message-source 'market-data' at bus:market");
    }

    #[test]
    fn test_kind_wire_tag() {
        let json = serde_json::to_string(&RecordKind::MessageSource).unwrap();
        assert_eq!(json, "\"message-source\"");
    }
}

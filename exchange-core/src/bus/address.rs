//! Address models for component locations.
//!
//! Defines the `Address` enum used as the locator of registry records, so
//! that components never hardcode where their collaborators live.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a published capability can be reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Address {
    /// Named channel on the message bus (topic or service address).
    /// Format: "bus:name"
    Bus(String),

    /// HTTP endpoint.
    /// Format: "http://host:port/root"
    Http { host: String, port: u16, root: String },
}

impl Address {
    /// Creates a new bus address.
    ///
    /// # Arguments
    ///
    /// * `name` - The topic or service address on the bus.
    pub fn bus(name: &str) -> Self {
        Address::Bus(name.to_string())
    }

    /// Creates a new HTTP address.
    ///
    /// # Arguments
    ///
    /// * `host` - Host name or IP (e.g., "localhost").
    /// * `port` - The TCP port.
    /// * `root` - Path prefix of the endpoint, "/" when empty.
    pub fn http(host: &str, port: u16, root: &str) -> Self {
        let root = if root.starts_with('/') {
            root.to_string()
        } else {
            format!("/{}", root)
        };
        Address::Http {
            host: host.to_string(),
            port,
            root,
        }
    }

    /// The bus channel name, if this is a bus address.
    pub fn as_bus(&self) -> Option<&str> {
        match self {
            Address::Bus(name) => Some(name),
            Address::Http { .. } => None,
        }
    }

    /// The base URL, if this is an HTTP address.
    pub fn url(&self) -> Option<String> {
        match self {
            Address::Http { .. } => Some(self.to_string()),
            Address::Bus(_) => None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Bus(name) => write!(f, "bus:{}", name),
            Address::Http { host, port, root } => write!(f, "http://{}:{}{}", host, port, root),
        }
    }
}

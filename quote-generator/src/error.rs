use exchange_core::DiscoveryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid configuration for company '{company}': {reason}")]
    InvalidConfig { company: String, reason: String },

    #[error("cannot start the quote API on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

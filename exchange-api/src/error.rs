use crate::model::trade::TradeAction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by portfolio operations.
///
/// The error is serializable because it travels back to remote callers of the
/// portfolio service.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerError {
    #[error("cannot {action} {company} - the amount must be greater than 0 (got {amount})")]
    InvalidAmount {
        action: TradeAction,
        company: String,
        amount: i64,
    },

    #[error("cannot buy {requested} of {company} - not enough stocks on the market ({available})")]
    InsufficientMarketSupply {
        company: String,
        requested: u64,
        available: u64,
    },

    #[error("cannot buy {amount} of {company} - not enough money, need {needed}, has {available}")]
    InsufficientFunds {
        company: String,
        amount: u64,
        needed: f64,
        available: f64,
    },

    #[error("cannot sell {requested} of {company} - not enough stocks in portfolio ({held})")]
    InsufficientHoldings {
        company: String,
        requested: u64,
        held: u64,
    },

    #[error("cannot buy {requested} of {company} - holding of {held} would overflow")]
    HoldingOverflow {
        company: String,
        requested: u64,
        held: u64,
    },

    /// A collaborator (quote endpoint, registry) could not be resolved.
    #[error("lookup failed: {0}")]
    LookupFailed(String),

    /// The portfolio service itself could not be reached.
    #[error("portfolio service unavailable: {0}")]
    Unavailable(String),
}

/// A message that decoded correctly but violates a model invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid message: {0}")]
pub struct InvalidMessage(String);

impl InvalidMessage {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

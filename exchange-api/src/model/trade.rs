use crate::error::InvalidMessage;
use crate::model::quote::Quote;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
        }
    }
}

/// What a trading policy wants to do with the quote it just received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOrder {
    pub action: TradeAction,
    /// Number of shares. Kept signed so that invalid requests reach the
    /// ledger and get rejected there.
    pub amount: i64,
}

impl TradeOrder {
    pub fn buy(amount: i64) -> Self {
        Self {
            action: TradeAction::Buy,
            amount,
        }
    }

    pub fn sell(amount: i64) -> Self {
        Self {
            action: TradeAction::Sell,
            amount,
        }
    }
}

/// Emitted by the portfolio ledger after every successful trade.
///
/// Events are append-only: observers receive them and never send them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvent {
    pub action: TradeAction,
    /// The quote the trade was executed against.
    pub quote: Quote,
    /// Unix timestamp in milliseconds.
    pub timestamp_millis: i64,
    /// Number of shares bought or sold.
    pub amount_traded: u64,
    /// Holding of the company right after the trade.
    pub new_holding: u64,
}

impl TradeEvent {
    pub fn new(
        action: TradeAction,
        quote: Quote,
        timestamp_millis: i64,
        amount_traded: u64,
        new_holding: u64,
    ) -> Self {
        Self {
            action,
            quote,
            timestamp_millis,
            amount_traded,
            new_holding,
        }
    }

    pub fn company_name(&self) -> &str {
        &self.quote.company_name
    }

    /// A trade always moves at least one share.
    pub fn validate(&self) -> Result<(), InvalidMessage> {
        if self.amount_traded == 0 {
            return Err(InvalidMessage::new("trade event without traded amount"));
        }
        self.quote.validate()
    }
}

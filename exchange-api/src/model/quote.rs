//! Market data model.
//!
//! A `Quote` is the snapshot published on every tick of a price feed. The
//! structure is close to the usual market data layout: best bid / ask, the
//! opening price and the number of shares still tradable.

use crate::error::InvalidMessage;
use serde::{Deserialize, Serialize};

/// Name reported in the `exchange` field of every generated quote.
pub const EXCHANGE_NAME: &str = "rust stock exchange";

/// One price snapshot for a company.
///
/// Quotes are immutable once emitted: consumers receive their own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Name of the market that produced the quote.
    #[serde(default)]
    pub exchange: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Company name, used as the holding key in portfolios.
    pub company_name: String,
    /// Best bid price (what a seller receives).
    pub bid: f64,
    /// Best ask price (what a buyer pays).
    pub ask: f64,
    /// Total number of shares issued.
    pub volume: u64,
    /// Shares currently available on the market.
    pub shares_available: u64,
    /// Price at which the instrument opened.
    pub open_price: f64,
}

impl Quote {
    /// Creates a quote with zeroed prices and no shares available.
    ///
    /// Use the `with_*` helpers to fill in market values.
    pub fn new(company_name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            exchange: EXCHANGE_NAME.to_string(),
            symbol: symbol.into(),
            company_name: company_name.into(),
            bid: 0.0,
            ask: 0.0,
            volume: 0,
            shares_available: 0,
            open_price: 0.0,
        }
    }

    pub fn with_prices(mut self, bid: f64, ask: f64) -> Self {
        self.bid = bid;
        self.ask = ask;
        self
    }

    pub fn with_shares(mut self, shares_available: u64, volume: u64) -> Self {
        self.shares_available = shares_available;
        self.volume = volume;
        self
    }

    pub fn with_open_price(mut self, open_price: f64) -> Self {
        self.open_price = open_price;
        self
    }

    /// Checks the invariants a consumer relies on.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the company name is set and every price is a finite,
    ///   non-negative number.
    /// * `Err(InvalidMessage)` describing the first violated rule.
    pub fn validate(&self) -> Result<(), InvalidMessage> {
        if self.company_name.trim().is_empty() {
            return Err(InvalidMessage::new("quote without company name"));
        }
        for (field, value) in [
            ("bid", self.bid),
            ("ask", self.ask),
            ("openPrice", self.open_price),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidMessage::new(format!(
                    "quote for {} has invalid {}: {}",
                    self.company_name, field, value
                )));
            }
        }
        Ok(())
    }
}

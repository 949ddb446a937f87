//! Messages exchanged with the portfolio service over the bus.

use exchange::{InvalidMessage, LedgerError, Portfolio, Quote};
use exchange_core::bus::BusMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum PortfolioRequest {
    GetPortfolio,
    Buy { amount: i64, quote: Quote },
    Sell { amount: i64, quote: Quote },
    Evaluate,
}

impl BusMessage for PortfolioRequest {
    fn validate(&self) -> Result<(), InvalidMessage> {
        match self {
            PortfolioRequest::Buy { quote, .. } | PortfolioRequest::Sell { quote, .. } => {
                quote.validate()
            }
            PortfolioRequest::GetPortfolio | PortfolioRequest::Evaluate => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortfolioResponse {
    Portfolio(Portfolio),
    Evaluation(f64),
    Failed(LedgerError),
}

impl BusMessage for PortfolioResponse {}

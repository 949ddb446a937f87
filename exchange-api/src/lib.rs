//! Domain types shared by every component of the stock exchange.
//!
//! Nothing in here performs I/O: the crate only describes quotes, portfolios,
//! trade events and the contracts that feeds and trading policies implement.

pub mod error;
pub mod model;
pub mod traits;

pub use error::{InvalidMessage, LedgerError};
pub use model::portfolio::Portfolio;
pub use model::quote::Quote;
pub use model::trade::{TradeAction, TradeEvent, TradeOrder};
pub use traits::quote_feed::QuoteFeed;
pub use traits::trading_policy::TradingPolicy;

pub mod prelude {
    pub use crate::error::LedgerError;
    pub use crate::model::portfolio::Portfolio;
    pub use crate::model::quote::Quote;
    pub use crate::model::trade::{TradeAction, TradeEvent, TradeOrder};
    pub use crate::traits::trading_policy::TradingPolicy;
}

//! Data models exchanged between components.
//!
//! # Submodules
//! - [`quote`]: one market snapshot for a company.
//! - [`portfolio`]: cash plus share holdings, with the trade rules.
//! - [`trade`]: trade actions, orders and the events emitted after a trade.

pub mod portfolio;
pub mod quote;
pub mod trade;

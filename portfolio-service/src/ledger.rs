//! The portfolio ledger.
//!
//! All mutations go through one mutex, and the trade event of a mutation is
//! published before the lock is released, so observers see events in the
//! order the trades were applied.

use crate::quotes::QuoteSource;
use chrono::Utc;
use exchange::{LedgerError, Portfolio, Quote, TradeAction, TradeEvent};
use exchange_core::bus::MessageSender;
use exchange_core::sync::lock;
use futures::future::join_all;
use log::{error, info, warn};
use std::sync::{Arc, Mutex};

/// Cash a fresh portfolio starts with.
pub const DEFAULT_CASH: f64 = 10_000.0;

pub struct PortfolioLedger {
    portfolio: Mutex<Portfolio>,
    events: MessageSender<TradeEvent>,
}

impl PortfolioLedger {
    /// Creates a ledger with `initial_cash` and no holdings.
    ///
    /// # Arguments
    ///
    /// * `initial_cash` - Starting cash balance.
    /// * `events` - Where a `TradeEvent` is published after every trade.
    pub fn new(initial_cash: f64, events: MessageSender<TradeEvent>) -> Self {
        Self {
            portfolio: Mutex::new(Portfolio::new(initial_cash)),
            events,
        }
    }

    /// Snapshot of the current portfolio.
    pub fn get_portfolio(&self) -> Portfolio {
        lock(&self.portfolio).clone()
    }

    /// Buys `amount` shares at the quote's ask.
    ///
    /// # Returns
    ///
    /// * `Ok(Portfolio)` - the portfolio right after the trade.
    /// * `Err(LedgerError)` - nothing changed and no event was emitted.
    pub fn buy(&self, amount: i64, quote: &Quote) -> Result<Portfolio, LedgerError> {
        let mut portfolio = lock(&self.portfolio);
        let new_holding = portfolio.buy(amount, quote)?;
        self.emit(TradeAction::Buy, amount, quote, new_holding);
        Ok(portfolio.clone())
    }

    /// Sells `amount` shares at the quote's bid.
    pub fn sell(&self, amount: i64, quote: &Quote) -> Result<Portfolio, LedgerError> {
        let mut portfolio = lock(&self.portfolio);
        let new_holding = portfolio.sell(amount, quote)?;
        self.emit(TradeAction::Sell, amount, quote, new_holding);
        Ok(portfolio.clone())
    }

    fn emit(&self, action: TradeAction, amount: i64, quote: &Quote, new_holding: u64) {
        info!(
            "{} {} of {}, now holding {}",
            action, amount, quote.company_name, new_holding
        );
        let event = TradeEvent::new(
            action,
            quote.clone(),
            Utc::now().timestamp_millis(),
            amount.unsigned_abs(),
            new_holding,
        );
        // The trade stands even if nobody hears about it.
        if let Err(e) = self.events.send(&event) {
            error!("Cannot publish trade event on '{}': {}", self.events.topic(), e);
        }
    }

    /// Values the holdings at the current bid of each company.
    ///
    /// Holdings are read once, then one lookup per company runs on its own
    /// task. A lookup that fails counts as 0. Dropping the returned future
    /// does not cancel lookups already started.
    pub async fn evaluate_with(&self, source: Arc<dyn QuoteSource>) -> f64 {
        let holdings: Vec<(String, u64)> = lock(&self.portfolio)
            .holdings()
            .iter()
            .map(|(company, shares)| (company.clone(), *shares))
            .collect();
        if holdings.is_empty() {
            return 0.0;
        }

        let lookups = holdings.into_iter().map(|(company, shares)| {
            let source = source.clone();
            tokio::spawn(async move {
                match source.bid(&company).await {
                    Ok(bid) => shares as f64 * bid,
                    Err(e) => {
                        warn!("{}, counted as 0", e);
                        0.0
                    }
                }
            })
        });

        join_all(lookups)
            .await
            .into_iter()
            .map(|value| {
                value.unwrap_or_else(|e| {
                    warn!("Valuation task failed, counted as 0: {}", e);
                    0.0
                })
            })
            .sum()
    }
}

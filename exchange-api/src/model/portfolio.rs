//! Portfolio model and the trade rules applied to it.
//!
//! The rules live next to the data so that every mutation goes through the
//! same checks: a trade is validated completely before anything is changed,
//! which means a rejected trade leaves the portfolio untouched.

use crate::error::LedgerError;
use crate::model::quote::Quote;
use crate::model::trade::TradeAction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cash plus the number of shares held per company.
///
/// Invariants: `cash >= 0` and every stored holding is strictly positive
/// (a holding that drops to zero is removed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    cash: f64,
    holdings: BTreeMap<String, u64>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Portfolio {
    /// Creates a portfolio with the given cash and no holdings.
    pub fn new(cash: f64) -> Self {
        Self {
            cash,
            holdings: BTreeMap::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn holdings(&self) -> &BTreeMap<String, u64> {
        &self.holdings
    }

    /// Number of shares held for `company` (0 when absent).
    pub fn amount_of(&self, company: &str) -> u64 {
        self.holdings.get(company).copied().unwrap_or(0)
    }

    pub fn has_holdings(&self) -> bool {
        !self.holdings.is_empty()
    }

    /// Buys `amount` shares at the quote's ask price.
    ///
    /// # Arguments
    ///
    /// * `amount` - Number of shares, must be strictly positive.
    /// * `quote` - The market snapshot the trade is executed against.
    ///
    /// # Returns
    ///
    /// * `Ok(new_holding)` once cash and holdings are updated.
    /// * `Err(LedgerError)` if the amount is not positive, the market does not
    ///   offer enough shares, the cash does not cover the price or the new
    ///   holding would not fit in a `u64`. The portfolio is unchanged in that
    ///   case.
    pub fn buy(&mut self, amount: i64, quote: &Quote) -> Result<u64, LedgerError> {
        let company = &quote.company_name;
        let amount = positive_amount(TradeAction::Buy, company, amount)?;

        if quote.shares_available < amount {
            return Err(LedgerError::InsufficientMarketSupply {
                company: company.clone(),
                requested: amount,
                available: quote.shares_available,
            });
        }

        let price = amount as f64 * quote.ask;
        if self.cash < price {
            return Err(LedgerError::InsufficientFunds {
                company: company.clone(),
                amount,
                needed: price,
                available: self.cash,
            });
        }

        let held = self.amount_of(company);
        let new_holding = held
            .checked_add(amount)
            .ok_or_else(|| LedgerError::HoldingOverflow {
                company: company.clone(),
                requested: amount,
                held,
            })?;
        self.cash -= price;
        self.holdings.insert(company.clone(), new_holding);
        Ok(new_holding)
    }

    /// Sells `amount` shares at the quote's bid price.
    ///
    /// # Returns
    ///
    /// * `Ok(new_holding)` once cash and holdings are updated. A holding that
    ///   reaches zero is removed.
    /// * `Err(LedgerError)` if the amount is not positive or more shares are
    ///   sold than held. The portfolio is unchanged in that case.
    pub fn sell(&mut self, amount: i64, quote: &Quote) -> Result<u64, LedgerError> {
        let company = &quote.company_name;
        let amount = positive_amount(TradeAction::Sell, company, amount)?;

        let held = self.amount_of(company);
        if held < amount {
            return Err(LedgerError::InsufficientHoldings {
                company: company.clone(),
                requested: amount,
                held,
            });
        }

        let new_holding = held - amount;
        if new_holding == 0 {
            self.holdings.remove(company);
        } else {
            self.holdings.insert(company.clone(), new_holding);
        }
        self.cash += amount as f64 * quote.bid;
        Ok(new_holding)
    }
}

fn positive_amount(action: TradeAction, company: &str, amount: i64) -> Result<u64, LedgerError> {
    match u64::try_from(amount) {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(LedgerError::InvalidAmount {
            action,
            company: company.to_string(),
            amount,
        }),
    }
}

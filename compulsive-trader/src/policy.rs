use exchange::{Quote, TradeOrder, TradingPolicy};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

/// Range of the share count a compulsive trader sticks to.
const MIN_SHARES: i64 = 1;
const MAX_SHARES: i64 = 7;

/// Trades one company, a fixed number of shares, on every tick of that
/// company; buy or sell is a coin flip.
pub struct CompulsivePolicy<R> {
    company: String,
    shares: i64,
    rng: R,
}

impl<R: Rng + Send> CompulsivePolicy<R> {
    /// Picks the company among `companies` and the share count at random.
    ///
    /// Returns `None` when there is no company to trade.
    pub fn pick(companies: &[String], mut rng: R) -> Option<Self> {
        let company = companies.choose(&mut rng)?.clone();
        let shares = rng.gen_range(MIN_SHARES..=MAX_SHARES);
        info!("Compulsive trader picked {} shares of {}", shares, company);
        Some(Self {
            company,
            shares,
            rng,
        })
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn shares(&self) -> i64 {
        self.shares
    }
}

impl<R: Rng + Send> TradingPolicy for CompulsivePolicy<R> {
    fn on_quote(&mut self, quote: &Quote) -> Option<TradeOrder> {
        if quote.company_name != self.company {
            return None;
        }
        if self.rng.gen_bool(0.5) {
            Some(TradeOrder::buy(self.shares))
        } else {
            Some(TradeOrder::sell(self.shares))
        }
    }
}

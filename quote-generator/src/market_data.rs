//! Random walk of one company's prices.
//!
//! The walk is intentionally crude: on every tick the value jumps up or down
//! by an integer amount lower than `variation`, and ask / bid land a few
//! units away from it on the same side.

use crate::config::CompanyConfig;
use exchange::{Quote, QuoteFeed};
use log::debug;
use rand::Rng;
use std::time::Duration;

/// Upper bound (exclusive) of the change applied to the available shares.
const MAX_SHARE_DELTA: u64 = 100;

/// The random draws of one tick.
///
/// Kept separate from the rng so a tick can be replayed exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub rising: bool,
    pub change: u32,
    pub ask_offset: u32,
    pub bid_offset: u32,
    pub share_delta: Option<u64>,
}

impl Step {
    pub fn draw<R: Rng>(rng: &mut R, variation: u32) -> Self {
        Self {
            rising: rng.gen_bool(0.5),
            change: rng.gen_range(0..variation),
            ask_offset: rng.gen_range(0..variation / 2),
            bid_offset: rng.gen_range(0..variation / 2),
            share_delta: rng.gen_bool(0.5).then(|| rng.gen_range(0..MAX_SHARE_DELTA)),
        }
    }
}

pub struct MarketData<R> {
    name: String,
    symbol: String,
    period: Duration,
    variation: u32,
    volume: u64,
    open_price: f64,
    value: f64,
    ask: f64,
    bid: f64,
    shares: u64,
    rng: R,
}

impl<R: Rng + Send> MarketData<R> {
    /// Creates the feed at its opening state.
    ///
    /// `config` must have passed `CompanyConfig::validate`.
    pub fn new(config: &CompanyConfig, mut rng: R) -> Self {
        let half = config.variation / 2;
        let ask = config.price + f64::from(rng.gen_range(0..half));
        let bid = config.price + f64::from(rng.gen_range(0..half));
        Self {
            name: config.name.clone(),
            symbol: config.symbol().to_string(),
            period: config.period(),
            variation: config.variation,
            volume: config.volume,
            open_price: config.price,
            value: config.price,
            ask,
            bid,
            shares: config.volume / 2,
            rng,
        }
    }

    /// Applies one tick.
    pub fn apply(&mut self, step: Step) {
        if step.rising {
            self.value += f64::from(step.change);
            self.ask = self.value + f64::from(step.ask_offset);
            self.bid = self.value + f64::from(step.bid_offset);
        } else {
            self.value -= f64::from(step.change);
            self.ask = self.value - f64::from(step.ask_offset);
            self.bid = self.value - f64::from(step.bid_offset);
        }

        if self.value <= 0.0 {
            self.value = 1.0;
        }
        if self.ask <= 0.0 {
            self.ask = 1.0;
        }
        if self.bid <= 0.0 {
            self.bid = 1.0;
        }

        // Out of range updates are skipped, not clamped.
        if let Some(delta) = step.share_delta {
            if delta > 0 && self.shares + delta < self.volume {
                self.shares += delta;
            }
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn quote(&self) -> Quote {
        Quote::new(self.name.as_str(), self.symbol.as_str())
            .with_prices(self.bid, self.ask)
            .with_shares(self.shares, self.volume)
            .with_open_price(self.open_price)
    }
}

impl<R: Rng + Send> QuoteFeed for MarketData<R> {
    fn company_name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn next_quote(&mut self) -> Quote {
        let step = Step::draw(&mut self.rng, self.variation);
        self.apply(step);
        debug!(
            "{}: value {:.2}, bid {:.2}, ask {:.2}, {} shares",
            self.name, self.value, self.bid, self.ask, self.shares
        );
        self.quote()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn acme() -> CompanyConfig {
        CompanyConfig {
            price: 20.0,
            volume: 500,
            ..CompanyConfig::new("Acme Corp")
        }
    }

    fn step(rising: bool, change: u32, offset: u32, share_delta: Option<u64>) -> Step {
        Step {
            rising,
            change,
            ask_offset: offset,
            bid_offset: offset,
            share_delta,
        }
    }

    #[test]
    fn test_opening_state() {
        let feed = MarketData::new(&acme(), StdRng::seed_from_u64(1));
        let quote = feed.quote();

        assert_eq!(quote.symbol, "Acme Corp");
        assert_eq!(quote.shares_available, 250);
        assert_eq!(quote.open_price, 20.0);
        assert!(quote.ask >= 20.0 && quote.ask < 70.0);
        assert!(quote.bid >= 20.0 && quote.bid < 70.0);
    }

    #[test]
    fn test_falling_prices_are_clamped() {
        let mut feed = MarketData::new(&acme(), StdRng::seed_from_u64(2));
        feed.apply(step(false, 99, 49, None));

        assert_eq!(feed.value(), 1.0);
        let quote = feed.quote();
        assert_eq!(quote.ask, 1.0);
        assert_eq!(quote.bid, 1.0);
    }

    #[test]
    fn test_rising_prices() {
        let mut feed = MarketData::new(&acme(), StdRng::seed_from_u64(3));
        feed.apply(step(true, 10, 3, None));

        assert_eq!(feed.value(), 30.0);
        assert_eq!(feed.quote().ask, 33.0);
    }

    #[test]
    fn test_share_update_outside_volume_is_skipped() {
        let config = CompanyConfig {
            volume: 100,
            ..acme()
        };
        let mut feed = MarketData::new(&config, StdRng::seed_from_u64(4));
        assert_eq!(feed.quote().shares_available, 50);

        feed.apply(step(true, 0, 0, Some(60)));
        assert_eq!(feed.quote().shares_available, 50);

        feed.apply(step(true, 0, 0, Some(49)));
        assert_eq!(feed.quote().shares_available, 99);

        feed.apply(step(true, 0, 0, Some(1)));
        assert_eq!(feed.quote().shares_available, 99);
    }

    #[test]
    fn test_seeded_walk_keeps_invariants() {
        let config = CompanyConfig {
            price: 5.0,
            ..CompanyConfig::new("Globex")
        };
        let mut feed = MarketData::new(&config, StdRng::seed_from_u64(42));

        for _ in 0..10_000 {
            let quote = feed.next_quote();
            assert!(feed.value() > 0.0);
            assert!(quote.ask > 0.0);
            assert!(quote.bid > 0.0);
            assert!(quote.shares_available > 0);
            assert!(quote.shares_available < quote.volume);
            assert!(quote.validate().is_ok());
        }
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut first = MarketData::new(&acme(), StdRng::seed_from_u64(7));
        let mut second = MarketData::new(&acme(), StdRng::seed_from_u64(7));
        for _ in 0..100 {
            assert_eq!(first.next_quote(), second.next_quote());
        }
    }
}

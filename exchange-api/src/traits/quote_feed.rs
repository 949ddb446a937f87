//! Defines the `QuoteFeed` trait for market data generation.
//!
//! A feed owns the price state of one instrument. The runner driving it
//! decides when to tick; the feed only knows how to move its prices and
//! describe them as a `Quote`.

use crate::model::quote::Quote;
use std::time::Duration;

/// A component that produces a new quote on every tick.
///
/// # Examples
///
/// ```
/// use exchange::{Quote, QuoteFeed};
/// use std::time::Duration;
///
/// struct Flat;
///
/// impl QuoteFeed for Flat {
///     fn company_name(&self) -> &str {
///         "Flat Inc"
///     }
///
///     fn period(&self) -> Duration {
///         Duration::from_secs(1)
///     }
///
///     fn next_quote(&mut self) -> Quote {
///         Quote::new("Flat Inc", "FLT").with_prices(1.0, 1.0)
///     }
/// }
/// ```
pub trait QuoteFeed: Send {
    /// The company this feed prices.
    fn company_name(&self) -> &str;

    /// Delay between two ticks.
    fn period(&self) -> Duration;

    /// Advances the price state by one tick and returns the resulting quote.
    fn next_quote(&mut self) -> Quote;
}

impl QuoteFeed for Box<dyn QuoteFeed> {
    fn company_name(&self) -> &str {
        (**self).company_name()
    }

    fn period(&self) -> Duration {
        (**self).period()
    }

    fn next_quote(&mut self) -> Quote {
        (**self).next_quote()
    }
}

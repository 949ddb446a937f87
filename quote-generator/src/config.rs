//! Per-company generator settings.

use crate::error::GeneratorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_period() -> u64 {
    3000
}

fn default_variation() -> u32 {
    100
}

fn default_volume() -> u64 {
    10_000
}

fn default_price() -> f64 {
    100.0
}

/// Settings of one simulated company, as found in the `companies` array of
/// the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
    /// Ticker symbol, the company name when absent.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Tick period in milliseconds.
    #[serde(default = "default_period")]
    pub period: u64,
    /// Upper bound (exclusive) of the value change on one tick.
    #[serde(default = "default_variation")]
    pub variation: u32,
    /// Total number of shares issued.
    #[serde(default = "default_volume")]
    pub volume: u64,
    /// Opening price.
    #[serde(default = "default_price")]
    pub price: f64,
}

impl CompanyConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: None,
            period: default_period(),
            variation: default_variation(),
            volume: default_volume(),
            price: default_price(),
        }
    }

    pub fn symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.name)
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period)
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        let reason = if self.name.trim().is_empty() {
            Some("the name must not be blank".to_string())
        } else if self.period == 0 {
            Some("the period must be at least 1 ms".to_string())
        } else if self.variation < 2 {
            Some(format!("the variation must be at least 2 (got {})", self.variation))
        } else if self.volume < 2 {
            Some(format!("the volume must be at least 2 (got {})", self.volume))
        } else if !(self.price.is_finite() && self.price > 0.0) {
            Some(format!("the price must be positive (got {})", self.price))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(GeneratorError::InvalidConfig {
                company: self.name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

use portfolio_service::{DEFAULT_CASH, DEFAULT_EVALUATION_PERIOD};
use quote_generator::CompanyConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_money() -> f64 {
    DEFAULT_CASH
}

fn default_http_port() -> u16 {
    8080
}

fn default_evaluation_period() -> u64 {
    DEFAULT_EVALUATION_PERIOD.as_secs()
}

/// Content of `conf/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default)]
    pub companies: Vec<CompanyConfig>,
    /// Initial cash of the portfolio.
    #[serde(default = "default_money")]
    pub money: f64,
    /// Port of the quote REST API.
    #[serde(rename = "http.port", default = "default_http_port")]
    pub http_port: u16,
    /// Seconds between two portfolio valuations.
    #[serde(rename = "evaluation.period", default = "default_evaluation_period")]
    pub evaluation_period: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            companies: Vec::new(),
            money: default_money(),
            http_port: default_http_port(),
            evaluation_period: default_evaluation_period(),
        }
    }
}

impl ExchangeConfig {
    pub fn evaluation_period(&self) -> Duration {
        Duration::from_secs(self.evaluation_period.max(1))
    }

    pub fn company_names(&self) -> Vec<String> {
        self.companies.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_core::config::{load_config, load_config_or_default};
    use std::path::Path;

    #[test]
    fn test_bundled_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../conf/config.json");
        let config: ExchangeConfig = load_config(&path).unwrap();

        assert_eq!(config.companies.len(), 3);
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.money, 10_000.0);
        assert!(config.companies.iter().all(|c| c.validate().is_ok()));
        assert_eq!(config.companies[0].period, 3000);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config: ExchangeConfig = load_config_or_default(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, ExchangeConfig::default());
        assert!(config.company_names().is_empty());
    }

    #[test]
    fn test_dotted_keys() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{ "http.port": 9000, "money": 50.0 }"#).unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.money, 50.0);
        assert_eq!(config.evaluation_period(), Duration::from_secs(10));
    }
}

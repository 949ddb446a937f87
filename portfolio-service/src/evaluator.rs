use crate::service::{PortfolioProxy, PortfolioService};
use exchange::LedgerError;
use exchange_core::{Bus, Microservice, Registry};
use log::{info, warn};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

pub const DEFAULT_EVALUATION_PERIOD: Duration = Duration::from_secs(10);

/// Periodically logs the value of the portfolio.
///
/// The service is looked up on every round, so the evaluator can start
/// before the portfolio service is deployed.
pub struct Evaluator {
    service: Microservice,
    period: Duration,
}

impl Evaluator {
    pub fn new(bus: Bus, registry: Registry, period: Duration) -> Self {
        Self {
            service: Microservice::new("evaluator", bus, registry),
            period,
        }
    }

    pub async fn evaluate_once(&self) -> Result<(f64, f64), LedgerError> {
        let portfolio = PortfolioProxy::discover(&self.service).await?;
        let value = portfolio.evaluate().await?;
        let cash = portfolio.get_portfolio().await?.cash();
        Ok((value, cash))
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.period, self.period);
            loop {
                ticker.tick().await;
                match self.evaluate_once().await {
                    Ok((value, cash)) => info!(
                        "Portfolio value: {:.2} in shares, {:.2} in cash, {:.2} total",
                        value,
                        cash,
                        value + cash
                    ),
                    Err(e) => warn!("Evaluation skipped: {}", e),
                }
            }
        })
    }
}

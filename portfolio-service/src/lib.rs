//! Portfolio service.
//!
//! Wraps the ledger in a bus service (`portfolio`) and publishes every trade
//! on the `portfolio-events` message source.

pub mod evaluator;
pub mod ledger;
pub mod protocol;
pub mod quotes;
pub mod service;

pub use evaluator::{Evaluator, DEFAULT_EVALUATION_PERIOD};
pub use ledger::{PortfolioLedger, DEFAULT_CASH};
pub use quotes::{HttpQuoteSource, QuoteError, QuoteSource};
pub use service::{PortfolioProxy, PortfolioService, PortfolioServiceImpl, PORTFOLIO_SERVICE};

use exchange::TradeEvent;
use exchange_core::{Bus, DiscoveryError, Microservice, Registry};
use log::error;
use service::PORTFOLIO_ADDRESS;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Topic trade events are published on.
pub const EVENTS_TOPIC: &str = "portfolio";
/// Registry name of the trade event topic.
pub const EVENTS_SOURCE: &str = "portfolio-events";

pub struct PortfolioComponent {
    service: Microservice,
    portfolio: Arc<PortfolioServiceImpl>,
    server: JoinHandle<()>,
}

impl PortfolioComponent {
    /// Binds the service on the bus, then publishes it and its event topic.
    pub async fn deploy(
        bus: Bus,
        registry: Registry,
        initial_cash: f64,
    ) -> Result<Self, DiscoveryError> {
        let endpoint = bus
            .bind(PORTFOLIO_ADDRESS)
            .map_err(|e| DiscoveryError::PublishFailed(e.to_string()))?;

        let ledger = PortfolioLedger::new(initial_cash, bus.sender::<TradeEvent>(EVENTS_TOPIC));
        let portfolio = Arc::new(PortfolioServiceImpl::new(ledger, registry.clone()));
        let server = tokio::spawn(service::serve(portfolio.clone(), endpoint));

        let component = Self {
            service: Microservice::new("portfolio-service", bus, registry),
            portfolio,
            server,
        };
        if let Err(e) = component.advertise().await {
            component.stop().await;
            return Err(e);
        }
        Ok(component)
    }

    async fn advertise(&self) -> Result<(), DiscoveryError> {
        self.service
            .publish_service(PORTFOLIO_SERVICE, PORTFOLIO_ADDRESS)
            .await?;
        self.service
            .publish_message_source(EVENTS_SOURCE, EVENTS_TOPIC)
            .await?;
        Ok(())
    }

    /// Direct access to the service, bypassing the bus.
    pub fn portfolio(&self) -> Arc<PortfolioServiceImpl> {
        self.portfolio.clone()
    }

    /// Withdraws the records and stops answering requests.
    pub async fn stop(self) {
        if let Err(e) = self.service.stop().await {
            error!("Portfolio service teardown incomplete: {}", e);
        }
        // Aborting the server drops the endpoint, which unbinds the address.
        self.server.abort();
    }
}

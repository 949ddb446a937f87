//! Wiring of every component into one process.

use crate::config::ExchangeConfig;
use anyhow::{Context, Result};
use compulsive_trader::{CompulsivePolicy, RunningTrader, TraderAgent};
use exchange::TradeEvent;
use exchange_core::{Bus, DiscoveryError, Microservice, Registry};
use log::{error, info, warn};
use portfolio_service::{Evaluator, PortfolioComponent, EVENTS_SOURCE};
use quote_generator::QuoteGenerator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;

pub struct Exchange {
    registry: Registry,
    generator: QuoteGenerator,
    portfolio: PortfolioComponent,
    audit: (Microservice, JoinHandle<()>),
    evaluator: JoinHandle<()>,
    traders: Vec<RunningTrader>,
}

impl Exchange {
    /// Starts the components in dependency order: market data, portfolio,
    /// audit, evaluator, traders.
    pub async fn start(config: &ExchangeConfig, traders: usize) -> Result<Self> {
        let bus = Bus::new();
        let registry = Registry::in_memory();

        let generator = QuoteGenerator::deploy(
            bus.clone(),
            registry.clone(),
            &config.companies,
            config.http_port,
        )
        .await
        .context("Failed to start the quote generator")?;

        let portfolio = match PortfolioComponent::deploy(bus.clone(), registry.clone(), config.money).await {
            Ok(portfolio) => portfolio,
            Err(e) => {
                generator.stop().await;
                return Err(e).context("Failed to start the portfolio service");
            }
        };

        let audit = Microservice::new("audit", bus.clone(), registry.clone());
        let audit_task = match spawn_audit(&audit).await {
            Ok(task) => task,
            Err(e) => {
                portfolio.stop().await;
                generator.stop().await;
                return Err(e).context("Failed to start the trade audit");
            }
        };

        let evaluator =
            Evaluator::new(bus.clone(), registry.clone(), config.evaluation_period()).spawn();

        let mut exchange = Self {
            registry: registry.clone(),
            generator,
            portfolio,
            audit: (audit, audit_task),
            evaluator,
            traders: Vec::new(),
        };

        let companies = config.company_names();
        for i in 1..=traders {
            let Some(policy) = CompulsivePolicy::pick(&companies, StdRng::from_entropy()) else {
                warn!("No company configured, no trader started");
                break;
            };
            let agent = TraderAgent::new(
                &format!("trader-{}", i),
                bus.clone(),
                registry.clone(),
                Box::new(policy),
            );
            match agent.start().await {
                Ok(trader) => exchange.traders.push(trader),
                Err(e) => error!("trader-{} could not start: {}", i, e),
            }
        }

        info!(
            "Stock exchange running: {} companies, {} traders, quotes on port {}",
            config.companies.len(),
            exchange.traders.len(),
            exchange.generator.local_addr().port()
        );
        Ok(exchange)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn trader_count(&self) -> usize {
        self.traders.len()
    }

    /// Stops the components in reverse start order.
    pub async fn shutdown(self) {
        info!("Shutting down the stock exchange");
        for trader in self.traders.into_iter().rev() {
            trader.stop().await;
        }

        self.evaluator.abort();

        let (audit, task) = self.audit;
        task.abort();
        if let Err(e) = audit.stop().await {
            error!("Audit teardown incomplete: {}", e);
        }

        self.portfolio.stop().await;
        self.generator.stop().await;
        info!("Stock exchange stopped");
    }
}

/// Logs every trade published on the portfolio events.
async fn spawn_audit(service: &Microservice) -> Result<JoinHandle<()>, DiscoveryError> {
    let mut events = service.message_source::<TradeEvent>(EVENTS_SOURCE).await?;
    Ok(tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(
                "[audit] {} {} x{} at bid {:.2} / ask {:.2}, holding {}",
                event.action,
                event.company_name(),
                event.amount_traded,
                event.quote.bid,
                event.quote.ask,
                event.new_holding
            );
        }
    }))
}

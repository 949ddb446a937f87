use exchange::{Quote, TradeAction, TradingPolicy};
use exchange_core::bus::MessageReceiver;
use exchange_core::{Bus, DiscoveryError, Microservice, Registry};
use futures::try_join;
use log::{error, info, warn};
use portfolio_service::protocol::{PortfolioRequest, PortfolioResponse};
use portfolio_service::{PortfolioProxy, PortfolioService, PORTFOLIO_SERVICE};
use tokio::task::JoinHandle;

/// Registry name of the quote topic the agent listens to.
pub const MARKET_DATA_SOURCE: &str = "market-data";

/// Applies a trading policy to every quote and sends the resulting orders to
/// the portfolio service.
pub struct TraderAgent {
    service: Microservice,
    policy: Box<dyn TradingPolicy>,
}

impl TraderAgent {
    pub fn new(name: &str, bus: Bus, registry: Registry, policy: Box<dyn TradingPolicy>) -> Self {
        Self {
            service: Microservice::new(name, bus, registry),
            policy,
        }
    }

    /// Resolves the quote topic and the portfolio service, then starts
    /// trading.
    ///
    /// # Returns
    ///
    /// * `Err(DiscoveryError)` if either collaborator is not published yet.
    pub async fn start(self) -> Result<RunningTrader, DiscoveryError> {
        let (ticks, client) = try_join!(
            self.service.message_source::<Quote>(MARKET_DATA_SOURCE),
            self.service
                .service_client::<PortfolioRequest, PortfolioResponse>(PORTFOLIO_SERVICE),
        )?;
        let portfolio = PortfolioProxy::new(client);
        info!("{} started", self.service.name());

        let name = self.service.name().to_string();
        let task = tokio::spawn(trade(name, ticks, portfolio, self.policy));
        Ok(RunningTrader {
            service: self.service,
            task,
        })
    }
}

async fn trade(
    name: String,
    mut ticks: MessageReceiver<Quote>,
    portfolio: PortfolioProxy,
    mut policy: Box<dyn TradingPolicy>,
) {
    while let Ok(quote) = ticks.recv().await {
        let Some(order) = policy.on_quote(&quote) else {
            continue;
        };
        let outcome = match order.action {
            TradeAction::Buy => portfolio.buy(order.amount, &quote).await,
            TradeAction::Sell => portfolio.sell(order.amount, &quote).await,
        };
        match outcome {
            Ok(state) => info!(
                "{}: {} {} of {} done, cash {:.2}",
                name,
                order.action,
                order.amount,
                quote.company_name,
                state.cash()
            ),
            Err(e) => warn!("{}: {}", name, e),
        }
    }
    info!("{}: market data closed", name);
}

pub struct RunningTrader {
    service: Microservice,
    task: JoinHandle<()>,
}

impl RunningTrader {
    pub fn name(&self) -> &str {
        self.service.name()
    }

    pub async fn stop(self) {
        self.task.abort();
        if let Err(e) = self.service.stop().await {
            error!("{} teardown incomplete: {}", self.service.name(), e);
        }
    }
}

//! The portfolio as a service.
//!
//! `PortfolioServiceImpl` runs next to the ledger and answers bus requests;
//! `PortfolioProxy` is what other components hold. Both implement
//! `PortfolioService`.

use crate::ledger::PortfolioLedger;
use crate::protocol::{PortfolioRequest, PortfolioResponse};
use crate::quotes::HttpQuoteSource;
use async_trait::async_trait;
use exchange::{LedgerError, Portfolio, Quote};
use exchange_core::bus::{ServiceClient, ServiceEndpoint};
use exchange_core::{Microservice, RecordKind, Registry};
use log::{debug, error, info};
use std::sync::Arc;

/// Registry name of the portfolio service.
pub const PORTFOLIO_SERVICE: &str = "portfolio";
/// Bus address the service is bound to.
pub const PORTFOLIO_ADDRESS: &str = "service.portfolio";
/// Registry name of the quote API used for valuations.
pub const QUOTES_ENDPOINT: &str = "quotes";

#[async_trait]
pub trait PortfolioService: Send + Sync {
    async fn get_portfolio(&self) -> Result<Portfolio, LedgerError>;

    async fn buy(&self, amount: i64, quote: &Quote) -> Result<Portfolio, LedgerError>;

    async fn sell(&self, amount: i64, quote: &Quote) -> Result<Portfolio, LedgerError>;

    /// Current value of the holdings, cash excluded.
    async fn evaluate(&self) -> Result<f64, LedgerError>;
}

pub struct PortfolioServiceImpl {
    ledger: PortfolioLedger,
    registry: Registry,
    http: reqwest::Client,
}

impl PortfolioServiceImpl {
    pub fn new(ledger: PortfolioLedger, registry: Registry) -> Self {
        Self {
            ledger,
            registry,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PortfolioService for PortfolioServiceImpl {
    async fn get_portfolio(&self) -> Result<Portfolio, LedgerError> {
        Ok(self.ledger.get_portfolio())
    }

    async fn buy(&self, amount: i64, quote: &Quote) -> Result<Portfolio, LedgerError> {
        self.ledger.buy(amount, quote)
    }

    async fn sell(&self, amount: i64, quote: &Quote) -> Result<Portfolio, LedgerError> {
        self.ledger.sell(amount, quote)
    }

    /// Resolves the quote API, then values every holding at its bid.
    ///
    /// Fails with `LookupFailed` only when the quote API is not published.
    async fn evaluate(&self) -> Result<f64, LedgerError> {
        let record = self
            .registry
            .lookup(QUOTES_ENDPOINT, RecordKind::HttpEndpoint)
            .await
            .map_err(|e| LedgerError::LookupFailed(e.to_string()))?;
        let url = record.location.url().ok_or_else(|| {
            LedgerError::LookupFailed(format!("'{}' is not an HTTP endpoint", QUOTES_ENDPOINT))
        })?;

        let source = HttpQuoteSource::with_client(self.http.clone(), &url);
        Ok(self.ledger.evaluate_with(Arc::new(source)).await)
    }
}

async fn handle(service: &dyn PortfolioService, request: PortfolioRequest) -> PortfolioResponse {
    let outcome = match request {
        PortfolioRequest::GetPortfolio => service.get_portfolio().await.map(PortfolioResponse::Portfolio),
        PortfolioRequest::Buy { amount, quote } => {
            service.buy(amount, &quote).await.map(PortfolioResponse::Portfolio)
        }
        PortfolioRequest::Sell { amount, quote } => {
            service.sell(amount, &quote).await.map(PortfolioResponse::Portfolio)
        }
        PortfolioRequest::Evaluate => service.evaluate().await.map(PortfolioResponse::Evaluation),
    };
    outcome.unwrap_or_else(PortfolioResponse::Failed)
}

/// Answers requests arriving on `endpoint` until it closes.
///
/// Each request is handled on its own task so a slow valuation does not hold
/// up trades.
pub async fn serve(
    service: Arc<dyn PortfolioService>,
    mut endpoint: ServiceEndpoint<PortfolioRequest, PortfolioResponse>,
) {
    info!("Portfolio service listening on '{}'", endpoint.address());
    while let Some((request, responder)) = endpoint.next().await {
        debug!("Portfolio request: {:?}", request);
        let service = service.clone();
        tokio::spawn(async move {
            let response = handle(service.as_ref(), request).await;
            if let Err(e) = responder.reply(&response) {
                error!("Cannot reply to portfolio request: {}", e);
            }
        });
    }
}

/// Client side of the portfolio service.
#[derive(Clone)]
pub struct PortfolioProxy {
    client: ServiceClient<PortfolioRequest, PortfolioResponse>,
}

impl PortfolioProxy {
    pub fn new(client: ServiceClient<PortfolioRequest, PortfolioResponse>) -> Self {
        Self { client }
    }

    /// Looks the service up through `service`'s registry.
    pub async fn discover(service: &Microservice) -> Result<Self, LedgerError> {
        service
            .service_client(PORTFOLIO_SERVICE)
            .await
            .map(Self::new)
            .map_err(|e| LedgerError::LookupFailed(e.to_string()))
    }

    async fn call(&self, request: PortfolioRequest) -> Result<PortfolioResponse, LedgerError> {
        match self.client.request(&request).await {
            Ok(PortfolioResponse::Failed(e)) => Err(e),
            Ok(response) => Ok(response),
            Err(e) => Err(LedgerError::Unavailable(e.to_string())),
        }
    }

    async fn portfolio(&self, request: PortfolioRequest) -> Result<Portfolio, LedgerError> {
        match self.call(request).await? {
            PortfolioResponse::Portfolio(portfolio) => Ok(portfolio),
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(response: &PortfolioResponse) -> LedgerError {
    LedgerError::Unavailable(format!("unexpected reply {:?}", response))
}

#[async_trait]
impl PortfolioService for PortfolioProxy {
    async fn get_portfolio(&self) -> Result<Portfolio, LedgerError> {
        self.portfolio(PortfolioRequest::GetPortfolio).await
    }

    async fn buy(&self, amount: i64, quote: &Quote) -> Result<Portfolio, LedgerError> {
        self.portfolio(PortfolioRequest::Buy {
            amount,
            quote: quote.clone(),
        })
        .await
    }

    async fn sell(&self, amount: i64, quote: &Quote) -> Result<Portfolio, LedgerError> {
        self.portfolio(PortfolioRequest::Sell {
            amount,
            quote: quote.clone(),
        })
        .await
    }

    async fn evaluate(&self) -> Result<f64, LedgerError> {
        match self.call(PortfolioRequest::Evaluate).await? {
            PortfolioResponse::Evaluation(value) => Ok(value),
            other => Err(unexpected(&other)),
        }
    }
}

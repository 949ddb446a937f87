//! Market data generator.
//!
//! One random-walk feed per configured company publishes quotes on the
//! `market` topic, and an HTTP API serves the last quote of each company.
//! Both are advertised in the registry: message source `market-data` and
//! HTTP endpoint `quotes`.

pub mod config;
pub mod error;
pub mod market_data;
pub mod rest;
pub mod runner;

pub use config::CompanyConfig;
pub use error::GeneratorError;
pub use market_data::MarketData;

use exchange::Quote;
use exchange_core::{Bus, Microservice, Registry};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rest::QuoteCache;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Bus topic carrying every generated quote.
pub const MARKET_TOPIC: &str = "market";
/// Registry name of the quote topic.
pub const MARKET_DATA_SOURCE: &str = "market-data";
/// Registry name of the quote REST API.
pub const QUOTES_ENDPOINT: &str = "quotes";

pub struct QuoteGenerator {
    service: Microservice,
    local_addr: SocketAddr,
    tasks: Vec<JoinHandle<()>>,
}

impl QuoteGenerator {
    /// Starts the feeds and the REST API, then advertises both.
    ///
    /// # Arguments
    ///
    /// * `bus` - Bus the quotes are published on.
    /// * `registry` - Registry to advertise in.
    /// * `companies` - One feed is started per entry.
    /// * `http_port` - Port of the REST API, 0 picks a free one.
    ///
    /// # Returns
    ///
    /// * `Err(GeneratorError::InvalidConfig)` before anything starts if a
    ///   company is misconfigured.
    pub async fn deploy(
        bus: Bus,
        registry: Registry,
        companies: &[CompanyConfig],
        http_port: u16,
    ) -> Result<Self, GeneratorError> {
        for company in companies {
            company.validate()?;
        }

        let listener = TcpListener::bind(("0.0.0.0", http_port))
            .await
            .map_err(|source| GeneratorError::Bind {
                port: http_port,
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| GeneratorError::Bind {
            port: http_port,
            source,
        })?;

        let service = Microservice::new("quote-generator", bus.clone(), registry);
        let mut tasks = Vec::new();

        // Subscribe before the first tick can be published.
        let cache = QuoteCache::default();
        tasks.push(tokio::spawn(rest::cache_quotes(
            bus.receiver::<Quote>(MARKET_TOPIC),
            cache.clone(),
        )));

        let app = rest::router(cache);
        tasks.push(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Quote API stopped: {}", e);
            }
        }));
        info!("Quote API listening on {}", local_addr);

        for company in companies {
            let feed = MarketData::new(company, StdRng::from_entropy());
            tasks.push(runner::spawn_feed(feed, bus.sender(MARKET_TOPIC)));
        }

        let generator = Self {
            service,
            local_addr,
            tasks,
        };
        if let Err(e) = generator.advertise().await {
            generator.stop().await;
            return Err(e);
        }
        Ok(generator)
    }

    async fn advertise(&self) -> Result<(), GeneratorError> {
        self.service
            .publish_message_source(MARKET_DATA_SOURCE, MARKET_TOPIC)
            .await?;
        self.service
            .publish_http_endpoint(QUOTES_ENDPOINT, "localhost", self.local_addr.port(), "/")
            .await?;
        Ok(())
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops the feeds and the API and withdraws the generator's records.
    pub async fn stop(self) {
        for task in &self.tasks {
            task.abort();
        }
        if let Err(e) = self.service.stop().await {
            error!("Quote generator teardown incomplete: {}", e);
        }
    }
}

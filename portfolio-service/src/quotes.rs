//! Where the ledger gets the bid price of a company when valuing holdings.

use async_trait::async_trait;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request for {company} failed: {source}")]
    Transport {
        company: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no quote for {company} (HTTP {status})")]
    Status { company: String, status: u16 },

    #[error("malformed quote for {company}: {reason}")]
    Malformed { company: String, reason: String },
}

/// Answers "what is the current bid for this company".
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn bid(&self, company: &str) -> Result<f64, QuoteError>;
}

/// Queries the quote REST API: `GET <base>?name=<company>`.
pub struct HttpQuoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuoteSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuses an existing client and its connection pool.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn bid(&self, company: &str) -> Result<f64, QuoteError> {
        let transport = |source| QuoteError::Transport {
            company: company.to_string(),
            source,
        };
        let malformed = |reason: String| QuoteError::Malformed {
            company: company.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("name", company)])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(QuoteError::Status {
                company: company.to_string(),
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| malformed(e.to_string()))?;
        let bid = body
            .get("bid")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| malformed("missing numeric 'bid'".to_string()))?;
        if !bid.is_finite() || bid < 0.0 {
            return Err(malformed(format!("bid {}", bid)));
        }
        debug!("Bid for {} is {}", company, bid);
        Ok(bid)
    }
}

//! Read-only REST API over the last known quotes.
//!
//! `GET /?name=<company>` returns the last quote of that company or 404;
//! without a (non-blank) name every known quote is returned, keyed by
//! company name.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use exchange::Quote;
use exchange_core::bus::MessageReceiver;
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

/// Last quote seen per company name.
pub type QuoteCache = Arc<RwLock<BTreeMap<String, Quote>>>;

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    name: Option<String>,
}

pub fn router(cache: QuoteCache) -> Router {
    Router::new()
        .route("/", get(get_quotes))
        .layer(TraceLayer::new_for_http())
        .with_state(cache)
}

async fn get_quotes(State(cache): State<QuoteCache>, Query(query): Query<QuoteQuery>) -> Response {
    let quotes = cache.read().await;
    match query.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => match quotes.get(name) {
            Some(quote) => Json(quote.clone()).into_response(),
            None => {
                debug!("No quote for '{}'", name);
                StatusCode::NOT_FOUND.into_response()
            }
        },
        None => Json(quotes.clone()).into_response(),
    }
}

/// Keeps `cache` up to date with the quotes published on the bus.
///
/// Returns when the topic closes.
pub async fn cache_quotes(mut receiver: MessageReceiver<Quote>, cache: QuoteCache) {
    while let Ok(quote) = receiver.recv().await {
        cache.write().await.insert(quote.company_name.clone(), quote);
    }
    info!("Quote cache stopped, '{}' is closed", receiver.topic());
}

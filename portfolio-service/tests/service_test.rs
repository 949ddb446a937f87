use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use exchange::{LedgerError, Quote, TradeAction, TradeEvent};
use exchange_core::{Bus, Microservice, Registry};
use portfolio_service::{
    Evaluator, PortfolioComponent, PortfolioProxy, PortfolioService, DEFAULT_EVALUATION_PERIOD,
    EVENTS_SOURCE,
};
use std::collections::HashMap;
use tokio::net::TcpListener;

fn quote(company: &str, bid: f64, ask: f64) -> Quote {
    Quote::new(company, company)
        .with_prices(bid, ask)
        .with_shares(1000, 2000)
}

/// Quote API knowing only company "A" at bid 2.0.
async fn quotes(Query(params): Query<HashMap<String, String>>) -> axum::response::Response {
    match params.get("name").map(String::as_str) {
        Some("A") => Json(quote("A", 2.0, 2.5)).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn publish_quote_api(registry: &Registry) -> Microservice {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().route("/", get(quotes)))
            .await
            .unwrap();
    });

    let generator = Microservice::new("fake-generator", Bus::new(), registry.clone());
    generator
        .publish_http_endpoint("quotes", "127.0.0.1", port, "/")
        .await
        .unwrap();
    generator
}

#[tokio::test]
async fn test_trades_through_the_proxy() {
    let bus = Bus::new();
    let registry = Registry::in_memory();
    let component = PortfolioComponent::deploy(bus.clone(), registry.clone(), 10_000.0)
        .await
        .unwrap();

    let trader = Microservice::new("trader", bus.clone(), registry.clone());
    let mut events = trader.message_source::<TradeEvent>(EVENTS_SOURCE).await.unwrap();
    let proxy = PortfolioProxy::discover(&trader).await.unwrap();

    let portfolio = proxy.buy(10, &quote("ACME", 45.0, 50.0)).await.unwrap();
    assert_eq!(portfolio.cash(), 9500.0);
    assert_eq!(portfolio.amount_of("ACME"), 10);

    let err = proxy.sell(11, &quote("ACME", 60.0, 61.0)).await.unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientHoldings { held: 10, .. }));

    let portfolio = proxy.sell(10, &quote("ACME", 60.0, 61.0)).await.unwrap();
    assert_eq!(portfolio.cash(), 10100.0);
    assert!(!portfolio.has_holdings());

    assert_eq!(events.recv().await.unwrap().action, TradeAction::Buy);
    assert_eq!(events.recv().await.unwrap().action, TradeAction::Sell);

    component.stop().await;
    assert!(registry.records().await.unwrap().is_empty());
    assert!(matches!(
        proxy.get_portfolio().await,
        Err(LedgerError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_evaluate_over_http() {
    let bus = Bus::new();
    let registry = Registry::in_memory();
    let _quotes = publish_quote_api(&registry).await;
    let component = PortfolioComponent::deploy(bus.clone(), registry.clone(), 10_000.0)
        .await
        .unwrap();

    let proxy = PortfolioProxy::discover(&Microservice::new("client", bus.clone(), registry.clone()))
        .await
        .unwrap();
    assert_eq!(proxy.evaluate().await.unwrap(), 0.0);

    proxy.buy(10, &quote("A", 1.0, 1.0)).await.unwrap();
    proxy.buy(5, &quote("B", 1.0, 1.0)).await.unwrap();
    assert_eq!(proxy.evaluate().await.unwrap(), 20.0);

    let evaluator = Evaluator::new(bus, registry, DEFAULT_EVALUATION_PERIOD);
    assert_eq!(evaluator.evaluate_once().await.unwrap(), (20.0, 9985.0));

    component.stop().await;
}

#[tokio::test]
async fn test_evaluate_without_quote_api() {
    let bus = Bus::new();
    let registry = Registry::in_memory();
    let component = PortfolioComponent::deploy(bus, registry, 500.0).await.unwrap();

    let err = component.portfolio().evaluate().await.unwrap_err();
    assert!(matches!(err, LedgerError::LookupFailed(_)));
    component.stop().await;
}

#[tokio::test]
async fn test_discovery_before_deployment() {
    let service = Microservice::new("early", Bus::new(), Registry::in_memory());
    assert!(matches!(
        PortfolioProxy::discover(&service).await,
        Err(LedgerError::LookupFailed(_))
    ));
}

use exchange::Quote;
use exchange_core::{Bus, RecordKind, Registry};
use quote_generator::{CompanyConfig, GeneratorError, QuoteGenerator, MARKET_DATA_SOURCE, QUOTES_ENDPOINT};

fn fast(name: &str) -> CompanyConfig {
    CompanyConfig {
        period: 5,
        ..CompanyConfig::new(name)
    }
}

#[tokio::test]
async fn test_deploy_publishes_and_tears_down() {
    let bus = Bus::new();
    let registry = Registry::in_memory();
    let generator = QuoteGenerator::deploy(
        bus.clone(),
        registry.clone(),
        &[fast("Acme Corp"), fast("Globex")],
        0,
    )
    .await
    .unwrap();

    let source = registry
        .lookup(MARKET_DATA_SOURCE, RecordKind::MessageSource)
        .await
        .unwrap();
    let mut receiver = bus.receiver::<Quote>(source.location.as_bus().unwrap());
    let quote = receiver.recv().await.unwrap();
    assert!(quote.company_name == "Acme Corp" || quote.company_name == "Globex");

    let endpoint = registry
        .lookup(QUOTES_ENDPOINT, RecordKind::HttpEndpoint)
        .await
        .unwrap();
    assert_eq!(
        endpoint.location.url().unwrap(),
        format!("http://localhost:{}/", generator.local_addr().port())
    );

    generator.stop().await;
    assert!(registry.records().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_company_is_rejected() {
    let registry = Registry::in_memory();
    let broken = CompanyConfig {
        variation: 1,
        ..CompanyConfig::new("Broken")
    };

    let result = QuoteGenerator::deploy(Bus::new(), registry.clone(), &[broken], 0).await;
    assert!(matches!(result, Err(GeneratorError::InvalidConfig { .. })));
    assert!(registry.records().await.unwrap().is_empty());
}

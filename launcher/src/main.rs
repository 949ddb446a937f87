mod config;
mod system;

use anyhow::{Context, Result};
use clap::Parser;
use config::ExchangeConfig;
use exchange_core::args::CommonArgs;
use exchange_core::config::load_config_or_default;
use log::info;
use system::Exchange;

/// Toy stock exchange: quote feeds, a portfolio and compulsive traders.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of compulsive traders to start
    #[arg(long, default_value_t = 3)]
    traders: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.common.log_level))
        .init();
    info!("=== Stock Exchange Starting ===");

    let mut config: ExchangeConfig = load_config_or_default(&args.common.config)?;
    if let Some(port) = args.common.http_port {
        config.http_port = port;
    }

    let exchange = Exchange::start(&config, args.traders).await?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    exchange.shutdown().await;
    Ok(())
}

//! Command-line arguments shared by every binary of the exchange.
//!
//! Binaries `#[command(flatten)]` `CommonArgs` into their own parser so the
//! config and logging flags behave the same everywhere.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "conf/config.json")]
    pub config: PathBuf,

    /// Port of the quote REST API, overrides `http.port` from the config file
    #[arg(long)]
    pub http_port: Option<u16>,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "info,exchange_core=debug")
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

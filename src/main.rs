mod api;
mod cli;
mod core;
mod trading;

use anyhow::Result;
use crate::api::BinanceFuturesClient;
use crate::cli::InteractiveShell;
use crate::core::Config;
use crate::trading::OrderGateway;
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration; missing credentials terminate here.
    let config = Config::from_env()?;

    crate::core::logging::init_logging(&config.logging.log_level, &config.logging.log_file)?;

    tracing::info!("Binance Futures Bot starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Bot initialized with testnet: {}", config.binance.testnet);

    let client = BinanceFuturesClient::new(config.binance);

    match client.ping().await {
        Ok(true) => tracing::info!("Exchange reachable at startup"),
        Ok(false) | Err(_) => {
            tracing::warn!("Exchange not reachable at startup; orders will fail until it is")
        }
    }

    let gateway = OrderGateway::new(client);
    let stdin = io::stdin();
    let mut shell = InteractiveShell::new(gateway, stdin.lock(), io::stdout());
    shell.run().await
}

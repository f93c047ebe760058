use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";
const LIVE_BASE_URL: &str = "https://fapi.binance.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub binance: BinanceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    pub api_key: String,
    pub api_secret: String,
    pub testnet: bool,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_file: String,
    pub log_level: String,
}

impl Config {
    /// Reads configuration from the environment (and a .env file if present).
    /// Missing credentials fail here, before any order could have been placed,
    /// so the error is allowed to propagate and terminate the process.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let testnet = env::var("BINANCE_TESTNET")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Config {
            binance: BinanceConfig {
                api_key: env::var("BINANCE_API_KEY").context("BINANCE_API_KEY must be set")?,
                api_secret: env::var("BINANCE_API_SECRET")
                    .context("BINANCE_API_SECRET must be set")?,
                testnet,
                base_url: if testnet {
                    TESTNET_BASE_URL.to_string()
                } else {
                    LIVE_BASE_URL.to_string()
                },
            },
            logging: LoggingConfig {
                log_file: env::var("LOG_FILE").unwrap_or_else(|_| "bot.log".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
        })
    }
}

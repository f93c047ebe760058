pub mod binance;
pub mod error;
pub mod types;

pub use binance::BinanceFuturesClient;
pub use error::ApiError;
pub use types::*;

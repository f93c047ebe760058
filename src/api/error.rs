use serde::Deserialize;
use thiserror::Error;

/// Everything a remote call can fail with. Only `Rejected` is an answer from
/// the exchange; the other variants mean the call itself did not complete.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Rejected { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to decode exchange response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Binance error body: `{"code": -2019, "msg": "Margin is insufficient."}`
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: i64,
    pub msg: String,
}

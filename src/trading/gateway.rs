use anyhow::Result;
use async_trait::async_trait;

use crate::api::{ApiError, BinanceFuturesClient, OrderRequest, OrderResult, OrderSide};

/// The remote collaborator: two logical calls against an authenticated
/// exchange session. Kept as a trait so the gateway can be exercised
/// without a live exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeSession: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResult, ApiError>;
    async fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, ApiError>;
}

#[async_trait]
impl ExchangeSession for BinanceFuturesClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResult, ApiError> {
        BinanceFuturesClient::create_order(self, request).await
    }

    async fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, ApiError> {
        BinanceFuturesClient::get_order(self, symbol, order_id).await
    }
}

/// An exchange-side rejection: the call completed and the exchange said no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub code: i64,
    pub message: String,
}

/// What a gateway operation resolved to. Transport-level failures are not
/// represented here; those propagate as errors to the caller's boundary.
#[derive(Debug)]
pub enum OperationOutcome {
    Success(OrderResult),
    Failure(Rejection),
}

/// Thin order-submission wrapper over an exchange session. Issues exactly
/// one remote call per operation and writes exactly one log line per
/// attempt: info with the result payload, error with the exchange message.
pub struct OrderGateway<S: ExchangeSession> {
    session: S,
}

impl<S: ExchangeSession> OrderGateway<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub async fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: f64,
    ) -> Result<OperationOutcome> {
        let request = OrderRequest::market(symbol, side, quantity);
        self.submit_order("Market", request).await
    }

    pub async fn place_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: f64,
        price: f64,
    ) -> Result<OperationOutcome> {
        let request = OrderRequest::limit(symbol, side, quantity, price);
        self.submit_order("Limit", request).await
    }

    pub async fn get_order_status(&self, symbol: &str, order_id: i64) -> Result<OperationOutcome> {
        match self.session.get_order(symbol, order_id).await {
            Ok(order) => {
                tracing::info!("Fetched order status: {}", order);
                Ok(OperationOutcome::Success(order))
            }
            Err(ApiError::Rejected { code, message }) => {
                tracing::error!("Error fetching order status: {}", message);
                Ok(OperationOutcome::Failure(Rejection { code, message }))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn submit_order(&self, kind: &str, request: OrderRequest) -> Result<OperationOutcome> {
        match self.session.create_order(&request).await {
            Ok(order) => {
                tracing::info!("{} Order placed: {}", kind, order);
                Ok(OperationOutcome::Success(order))
            }
            Err(ApiError::Rejected { code, message }) => {
                tracing::error!(
                    "Error placing {} order: {}",
                    kind.to_lowercase(),
                    message
                );
                Ok(OperationOutcome::Failure(Rejection { code, message }))
            }
            Err(err) => Err(err.into()),
        }
    }
}

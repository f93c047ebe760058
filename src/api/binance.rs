use hmac::{Hmac, Mac};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use sha2::Sha256;

use super::error::{ApiError, ErrorBody};
use super::types::{OrderRequest, OrderResult};
use crate::core::config::BinanceConfig;

type HmacSha256 = Hmac<Sha256>;

/// Signed REST client for the Binance USDⓈ-M futures API. Owns the
/// credentials and the base-URL selection (testnet vs live) for the
/// process lifetime.
pub struct BinanceFuturesClient {
    client: Client,
    config: BinanceConfig,
}

impl BinanceFuturesClient {
    pub fn new(config: BinanceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn generate_signature(&self, query: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.config.api_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(query.as_bytes());

        hex::encode(mac.finalize().into_bytes())
    }

    fn build_query(params: &[(&'static str, String)]) -> String {
        params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    async fn signed_request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, ApiError> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        params.push(("timestamp", timestamp.to_string()));

        // The signature covers the exact query string that goes on the wire.
        let query = Self::build_query(&params);
        let signature = self.generate_signature(&query);
        let url = format!(
            "{}{}?{}&signature={}",
            self.config.base_url, endpoint, query, signature
        );

        tracing::debug!("{} {}{}", method, self.config.base_url, endpoint);

        let response = self
            .client
            .request(method, &url)
            .header("X-MBX-APIKEY", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        Self::parse_response(status, body)
    }

    /// A non-2xx status is only a rejection when the body carries the
    /// exchange's `{"code","msg"}` record; anything else (a proxy's HTML
    /// 502 page, say) did not come from the exchange and stays an
    /// unexpected error.
    fn parse_response<T: DeserializeOwned>(
        status: StatusCode,
        body: String,
    ) -> Result<T, ApiError> {
        if !status.is_success() {
            return match serde_json::from_str::<ErrorBody>(&body) {
                Ok(detail) => Err(ApiError::Rejected {
                    code: detail.code,
                    message: detail.msg,
                }),
                Err(_) => Err(ApiError::Http {
                    status: status.as_u16(),
                    body,
                }),
            };
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// `POST /fapi/v1/order` — place a new order.
    pub async fn create_order(&self, request: &OrderRequest) -> Result<OrderResult, ApiError> {
        self.signed_request(Method::POST, "/fapi/v1/order", request.query_params())
            .await
    }

    /// `GET /fapi/v1/order` — fetch an order by exchange-assigned id.
    pub async fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, ApiError> {
        let params = vec![
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
        ];
        self.signed_request(Method::GET, "/fapi/v1/order", params).await
    }

    /// Unauthenticated connectivity check.
    pub async fn ping(&self) -> Result<bool, ApiError> {
        let url = format!("{}/fapi/v1/ping", self.config.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

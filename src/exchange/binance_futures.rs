use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use std::time::Duration;

use crate::config::ExchangeConfig;
use crate::error::TradingError;
use crate::exchange::traits::FuturesClient;
use crate::models::account::AccountBalance;
use crate::models::order::{CancelAllResult, OrderRequest, OrderResult};

type HmacSha256 = Hmac<Sha256>;

/// Order-specific rejection codes (the -20xx family in the Binance futures error list)
const ORDER_REJECTION_CODES: &[i64] = &[-2010, -2020, -2021, -2022, -2023, -2024, -2025, -2026, -2027, -2028];

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
  code: i64,
  msg: String,
}

/// Binance USDT-M Futures REST connector
pub struct BinanceFuturesExchange {
  pub base_url: String,
  pub api_key: String,
  pub api_secret: String,
  pub recv_window_ms: u64,
  pub http: reqwest::Client,
}

impl BinanceFuturesExchange {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
    BinanceFuturesExchange {
      base_url: base_url.into(),
      api_key: api_key.into(),
      api_secret: api_secret.into(),
      recv_window_ms: 5000,
      http: reqwest::Client::new(),
    }
  }

  /// Build a connector from exchange settings; credentials must already be resolved
  pub fn from_config(cfg: &ExchangeConfig, api_key: String, api_secret: String) -> Result<Self, TradingError> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_millis(cfg.timeout_ms))
      .build()?;
    Ok(BinanceFuturesExchange {
      base_url: cfg.resolved_base_url(),
      api_key,
      api_secret,
      recv_window_ms: cfg.recv_window_ms,
      http,
    })
  }

  fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
  }

  fn sign(&self, query: &str) -> Result<String, TradingError> {
    let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
      .map_err(|e| TradingError::Unexpected(format!("invalid signing key: {}", e)))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
  }

  /// Append recvWindow/timestamp, sign and send; non-2xx bodies become typed errors
  async fn signed_request<T: DeserializeOwned>(
    &self,
    method: Method,
    path: &str,
    mut params: Vec<(&'static str, String)>,
  ) -> Result<T, TradingError> {
    params.push(("recvWindow", self.recv_window_ms.to_string()));
    params.push(("timestamp", Self::timestamp_ms().to_string()));
    let query = encode_params(&params)?;
    let signature = self.sign(&query)?;
    let url = format!("{}{}?{}&signature={}", self.base_url, path, query, signature);

    let res = self.http
      .request(method, url)
      .header("X-MBX-APIKEY", &self.api_key)
      .send().await?;
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
      return Err(api_error(status.as_u16(), &body));
    }
    serde_json::from_str::<T>(&body)
      .map_err(|e| TradingError::Unexpected(format!("{} parse error: {} (body: {})", path, e, body)))
  }
}

/// Query parameters for `POST /fapi/v1/order`
pub fn order_params(request: &OrderRequest) -> Vec<(&'static str, String)> {
  let mut params = vec![
    ("symbol", request.symbol.clone()),
    ("side", request.side.as_str().to_string()),
    ("type", request.order_type.as_str().to_string()),
    ("quantity", request.quantity.to_string()),
  ];
  if let Some(price) = request.price {
    params.push(("price", price.to_string()));
  }
  if let Some(stop_price) = request.stop_price {
    params.push(("stopPrice", stop_price.to_string()));
  }
  if let Some(tif) = request.time_in_force {
    params.push(("timeInForce", tif.as_str().to_string()));
  }
  if request.reduce_only {
    params.push(("reduceOnly", "true".to_string()));
  }
  if let Some(cid) = &request.client_order_id {
    params.push(("newClientOrderId", cid.clone()));
  }
  params
}

/// x-www-form-urlencoded query. The signature is computed over exactly this string
fn encode_params(params: &[(&'static str, String)]) -> Result<String, TradingError> {
  serde_urlencoded::to_string(params)
    .map_err(|e| TradingError::Unexpected(format!("query encoding error: {}", e)))
}

/// Map an error response to the error taxonomy
pub fn api_error(status: u16, body: &str) -> TradingError {
  match serde_json::from_str::<ApiErrorBody>(body) {
    Ok(err) if ORDER_REJECTION_CODES.contains(&err.code) => {
      TradingError::RemoteOrderError { code: err.code, message: err.msg }
    }
    Ok(err) => TradingError::RemoteRejection { status, code: err.code, message: err.msg },
    Err(_) => TradingError::RemoteRejection { status, code: 0, message: body.to_string() },
  }
}

#[async_trait]
impl FuturesClient for BinanceFuturesExchange {
  async fn create_order(&self, request: &OrderRequest) -> Result<OrderResult, TradingError> {
    self.signed_request(Method::POST, "/fapi/v1/order", order_params(request)).await
  }

  async fn cancel_all_open_orders(&self, symbol: &str) -> Result<CancelAllResult, TradingError> {
    let params = vec![("symbol", symbol.to_string())];
    self.signed_request(Method::DELETE, "/fapi/v1/allOpenOrders", params).await
  }

  async fn cancel_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, TradingError> {
    let params = vec![("symbol", symbol.to_string()), ("orderId", order_id.to_string())];
    self.signed_request(Method::DELETE, "/fapi/v1/order", params).await
  }

  async fn account_balance(&self) -> Result<Vec<AccountBalance>, TradingError> {
    self.signed_request(Method::GET, "/fapi/v2/balance", Vec::new()).await
  }
}

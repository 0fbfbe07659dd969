/**
* filename : market
* author : HAMA
* date: 2025. 5. 8.
* description: 시장가 주문
**/

use crate::error::TradingError;
use crate::exchange::traits::FuturesClient;
use crate::models::order::{OrderRequest, OrderResult};
use crate::order_core::validator::{validate_positive_quantity, validate_side, validate_symbol, NumericInput};
use crate::utils::logging;

/// 시장가 주문 실행
///
/// 검증 또는 거래소 오류는 분류 태그와 함께 한 번 로그를 남기고 그대로 반환한다.
pub async fn place_market_order<Q: NumericInput + Send>(
  client: &dyn FuturesClient,
  symbol: &str,
  side: &str,
  quantity: Q,
) -> Result<OrderResult, TradingError> {
  let result = submit(client, symbol, side, quantity).await;
  if let Err(e) = &result {
    logging::log_failure("Market Order", e);
  }
  result
}

async fn submit<Q: NumericInput + Send>(
  client: &dyn FuturesClient,
  symbol: &str,
  side: &str,
  quantity: Q,
) -> Result<OrderResult, TradingError> {
  let symbol = validate_symbol(symbol)?;
  let side = validate_side(side)?;
  let quantity = validate_positive_quantity(quantity, "quantity")?;

  log::info!("Placing Market Order: {} {} {}", side, quantity, symbol);
  let order = client.create_order(&OrderRequest::market(symbol, side, quantity)).await?;
  logging::log_order_placed("Market Order", &order);
  Ok(order)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::account::AccountBalance;
  use crate::models::order::{CancelAllResult, OrderSide, OrderType};
  use async_trait::async_trait;
  use mockall::mock;
  use mockall::predicate::*;

  mock! {
    Client {}
    #[async_trait]
    impl FuturesClient for Client {
      async fn create_order(&self, request: &OrderRequest) -> Result<OrderResult, TradingError>;
      async fn cancel_all_open_orders(&self, symbol: &str) -> Result<CancelAllResult, TradingError>;
      async fn cancel_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, TradingError>;
      async fn account_balance(&self) -> Result<Vec<AccountBalance>, TradingError>;
    }
  }

  #[tokio::test]
  async fn test_returns_exchange_response_unchanged() {
    let response = OrderResult {
      order_id: Some(42),
      status: Some("FILLED".into()),
      ..Default::default()
    };
    let expected = response.clone();

    let mut client = MockClient::new();
    client
      .expect_create_order()
      .withf(|req| {
        req.symbol == "BTCUSDT"
          && req.side == OrderSide::Buy
          && req.order_type == OrderType::Market
          && req.quantity == 0.01
          && req.price.is_none()
          && !req.reduce_only
      })
      .times(1)
      .returning(move |_| Ok(response.clone()));

    let order = place_market_order(&client, "btcusdt", "buy", 0.01).await.unwrap();
    assert_eq!(order, expected);
  }

  #[tokio::test]
  async fn test_invalid_input_never_reaches_exchange() {
    let mut client = MockClient::new();
    client.expect_create_order().never();

    assert!(matches!(
      place_market_order(&client, "BTCUSDT", "HOLD", 1.0).await,
      Err(TradingError::InvalidInput(_))
    ));
    assert!(matches!(
      place_market_order(&client, "BTC", "BUY", 1.0).await,
      Err(TradingError::InvalidInput(_))
    ));
    assert!(matches!(
      place_market_order(&client, "BTCUSDT", "BUY", "zero").await,
      Err(TradingError::InvalidInput(_))
    ));
    assert!(matches!(
      place_market_order(&client, "BTCUSDT", "SELL", -2.0).await,
      Err(TradingError::InvalidInput(_))
    ));
  }

  #[tokio::test]
  async fn test_remote_failure_is_returned() {
    let mut client = MockClient::new();
    client
      .expect_create_order()
      .with(always())
      .times(1)
      .returning(|_| Err(TradingError::RemoteRejection { status: 400, code: -2019, message: "Margin is insufficient.".into() }));

    let err = place_market_order(&client, "BTCUSDT", "BUY", 5.0).await.unwrap_err();
    assert!(matches!(err, TradingError::RemoteRejection { code: -2019, .. }));
  }
}

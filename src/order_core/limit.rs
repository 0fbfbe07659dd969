/**
* filename : limit
* author : HAMA
* date: 2025. 5. 8.
* description: 지정가 주문
**/

use crate::error::TradingError;
use crate::exchange::traits::FuturesClient;
use crate::models::order::{OrderRequest, OrderResult, TimeInForce};
use crate::order_core::validator::{validate_positive_quantity, validate_side, validate_symbol, NumericInput};
use crate::utils::logging;

/// 지정가 주문 실행. time in force 기본값은 GTC
pub async fn place_limit_order<Q: NumericInput + Send, P: NumericInput + Send>(
  client: &dyn FuturesClient,
  symbol: &str,
  side: &str,
  quantity: Q,
  price: P,
  time_in_force: Option<TimeInForce>,
) -> Result<OrderResult, TradingError> {
  let result = submit(client, symbol, side, quantity, price, time_in_force.unwrap_or_default()).await;
  if let Err(e) = &result {
    logging::log_failure("Limit Order", e);
  }
  result
}

async fn submit<Q: NumericInput + Send, P: NumericInput + Send>(
  client: &dyn FuturesClient,
  symbol: &str,
  side: &str,
  quantity: Q,
  price: P,
  time_in_force: TimeInForce,
) -> Result<OrderResult, TradingError> {
  let symbol = validate_symbol(symbol)?;
  let side = validate_side(side)?;
  let quantity = validate_positive_quantity(quantity, "quantity")?;
  let price = validate_positive_quantity(price, "price")?;

  log::info!("Placing Limit Order: {} {} {} at {} ({})", side, quantity, symbol, price, time_in_force);
  let request = OrderRequest::limit(symbol, side, quantity, price).with_time_in_force(time_in_force);
  let order = client.create_order(&request).await?;
  logging::log_order_placed("Limit Order", &order);
  Ok(order)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::exchange::mocks::MockExchange;
  use crate::models::order::{OrderSide, OrderType};

  #[tokio::test]
  async fn test_limit_order_defaults_to_gtc() {
    let exchange = MockExchange::new();
    let order = place_limit_order(&exchange, "ethusdt", "sell", 1.5, 2100.0, None).await.unwrap();
    assert_eq!(order.status_str(), "NEW");

    let sent = exchange.submitted();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].symbol, "ETHUSDT");
    assert_eq!(sent[0].side, OrderSide::Sell);
    assert_eq!(sent[0].order_type, OrderType::Limit);
    assert_eq!(sent[0].price, Some(2100.0));
    assert_eq!(sent[0].time_in_force, Some(TimeInForce::Gtc));
  }

  #[tokio::test]
  async fn test_explicit_time_in_force_forwarded() {
    let exchange = MockExchange::new();
    place_limit_order(&exchange, "BTCUSDT", "BUY", "0.002", "30000", Some(TimeInForce::Gtx)).await.unwrap();
    assert_eq!(exchange.submitted()[0].time_in_force, Some(TimeInForce::Gtx));
  }

  #[tokio::test]
  async fn test_bad_price_rejected_locally() {
    let exchange = MockExchange::new();
    let err = place_limit_order(&exchange, "BTCUSDT", "BUY", 1.0, 0.0, None).await.unwrap_err();
    assert!(matches!(err, TradingError::InvalidInput(_)));
    assert!(exchange.submitted().is_empty());
  }
}

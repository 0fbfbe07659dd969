//! OCO 전략
//!
//! 진입 포지션의 반대 방향으로 reduce-only 손절(STOP_MARKET)과 익절(TAKE_PROFIT_MARKET)
//! 주문을 차례로 낸다. 거래소에서 두 주문은 하나로 묶이지 않는다.

use serde::Serialize;
use uuid::Uuid;

use crate::error::TradingError;
use crate::exchange::traits::FuturesClient;
use crate::models::order::{OrderRequest, OrderResult, OrderType};
use crate::order_core::validator::{validate_positive_quantity, validate_side, validate_symbol, NumericInput};
use crate::utils::logging;

/// 손절/익절 두 주문의 거래소 응답
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcoResult {
    pub stop_loss: OrderResult,
    pub take_profit: OrderResult,
}

#[derive(Debug, Clone, Copy)]
pub struct OcoOptions {
    /// 익절 주문 실패 시 이미 들어간 손절 주문을 취소할지 여부
    pub compensate: bool,
}

impl Default for OcoOptions {
    fn default() -> Self {
        OcoOptions { compensate: true }
    }
}

/// OCO 주문 실행
///
/// `position_side`는 진입 포지션 방향이다 (롱이면 BUY). 청산 주문은 반대 방향으로 나간다.
pub async fn place_oco_order<N: NumericInput + Send>(
    client: &dyn FuturesClient,
    symbol: &str,
    position_side: &str,
    quantity: N,
    stop_price: N,
    take_profit_price: N,
    options: OcoOptions,
) -> Result<OcoResult, TradingError> {
    let result = submit(client, symbol, position_side, quantity, stop_price, take_profit_price, options).await;
    if let Err(e) = &result {
        logging::log_failure("OCO", e);
    }
    result
}

fn leg_client_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

async fn submit<N: NumericInput + Send>(
    client: &dyn FuturesClient,
    symbol: &str,
    position_side: &str,
    quantity: N,
    stop_price: N,
    take_profit_price: N,
    options: OcoOptions,
) -> Result<OcoResult, TradingError> {
    let symbol = validate_symbol(symbol)?;
    let side = validate_side(position_side)?;
    let quantity = validate_positive_quantity(quantity, "quantity")?;
    let stop_price = validate_positive_quantity(stop_price, "stop_price")?;
    let take_profit_price = validate_positive_quantity(take_profit_price, "take_profit_price")?;

    let close_side = side.opposite();
    log::info!("Placing OCO for {} (Position: {}). Close Side: {}", symbol, side, close_side);

    let stop_request = OrderRequest::new(symbol.clone(), close_side, OrderType::StopMarket, quantity)
        .with_stop_price(stop_price)
        .reduce_only()
        .with_client_order_id(leg_client_id("sl"));
    let stop_loss = client.create_order(&stop_request).await?;
    log::info!("Stop Loss Placed: {} at {}", stop_loss.display_id(), stop_price);

    let tp_request = OrderRequest::new(symbol.clone(), close_side, OrderType::TakeProfitMarket, quantity)
        .with_stop_price(take_profit_price)
        .reduce_only()
        .with_client_order_id(leg_client_id("tp"));
    let take_profit = match client.create_order(&tp_request).await {
        Ok(order) => order,
        Err(e) => {
            let compensated = if options.compensate {
                cancel_stop_leg(client, &symbol, &stop_loss).await
            } else {
                log::warn!("Stop Loss {} remains open without a Take Profit", stop_loss.display_id());
                false
            };
            return Err(TradingError::OcoLegFailed {
                leg: "take_profit",
                compensated,
                source: Box::new(e),
            });
        }
    };
    log::info!("Take Profit Placed: {} at {}", take_profit.display_id(), take_profit_price);

    Ok(OcoResult { stop_loss, take_profit })
}

/// 손절 주문 취소 시도. 취소 확인 시 true
async fn cancel_stop_leg(client: &dyn FuturesClient, symbol: &str, stop_loss: &OrderResult) -> bool {
    let Some(order_id) = stop_loss.order_id else {
        log::warn!("Stop Loss {} has no orderId; cancel it manually", stop_loss.display_id());
        return false;
    };
    match client.cancel_order(symbol, order_id).await {
        Ok(_) => {
            log::info!("Stop Loss {} cancelled after Take Profit failure", order_id);
            true
        }
        Err(e) => {
            logging::log_failure("OCO Compensation", &e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mocks::MockExchange;
    use crate::models::order::OrderSide;

    #[tokio::test]
    async fn test_long_position_closes_with_sell_legs() {
        let exchange = MockExchange::new();
        let result = place_oco_order(&exchange, "btcusdt", "BUY", 0.5, 25000.0, 32000.0, OcoOptions::default())
            .await
            .unwrap();

        let sent = exchange.submitted();
        assert_eq!(sent.len(), 2);

        assert_eq!(sent[0].order_type, OrderType::StopMarket);
        assert_eq!(sent[0].stop_price, Some(25000.0));
        assert_eq!(sent[1].order_type, OrderType::TakeProfitMarket);
        assert_eq!(sent[1].stop_price, Some(32000.0));
        for leg in &sent {
            assert_eq!(leg.symbol, "BTCUSDT");
            assert_eq!(leg.side, OrderSide::Sell);
            assert_eq!(leg.quantity, 0.5);
            assert!(leg.reduce_only);
            assert!(leg.price.is_none());
        }

        assert_eq!(result.stop_loss.order_type.as_deref(), Some("STOP_MARKET"));
        assert_eq!(result.take_profit.order_type.as_deref(), Some("TAKE_PROFIT_MARKET"));
    }

    #[tokio::test]
    async fn test_short_position_closes_with_buy_legs() {
        let exchange = MockExchange::new();
        place_oco_order(&exchange, "ETHUSDT", "sell", 2.0, 2300.0, 1900.0, OcoOptions::default())
            .await
            .unwrap();
        assert!(exchange.submitted().iter().all(|leg| leg.side == OrderSide::Buy));
    }

    #[tokio::test]
    async fn test_stop_leg_failure_sends_nothing_else() {
        let exchange = MockExchange::new();
        exchange.fail_order(1, TradingError::RemoteOrderError { code: -2021, message: "Order would immediately trigger.".into() });

        let err = place_oco_order(&exchange, "BTCUSDT", "BUY", 1.0, 25000.0, 32000.0, OcoOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TradingError::RemoteOrderError { code: -2021, .. }));
        assert_eq!(exchange.submitted().len(), 1);
        assert!(exchange.cancelled_orders().is_empty());
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_leg() {
        let exchange = MockExchange::new();
        let err = place_oco_order(&exchange, "BTCUSDT", "BUY", 1.0, 25000.0, -1.0, OcoOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("take_profit_price"));
        assert!(exchange.submitted().is_empty());
    }
}

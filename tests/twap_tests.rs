//! TWAP 관련 테스트
//!
//! 분할 수, 주문 간격, 실패 시 계속 진행, 중지 동작 확인 (가상 시간 사용)

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::{Duration, Instant};

use futures_bot::exchange::mocks::MockExchange;
use futures_bot::exchange::FuturesClient;
use futures_bot::models::account::AccountBalance;
use futures_bot::models::order::{CancelAllResult, OrderRequest, OrderResult, OrderSide, OrderType};
use futures_bot::strategies::{place_twap_order, TwapHandle, TwapOptions};
use futures_bot::TradingError;

/// 주문 시각을 기록하는 거래소
struct TimedExchange {
  start: Instant,
  calls: Mutex<Vec<(Duration, OrderRequest)>>,
}

impl TimedExchange {
  fn new() -> Self {
    Self { start: Instant::now(), calls: Mutex::new(Vec::new()) }
  }

  fn calls(&self) -> Vec<(Duration, OrderRequest)> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait]
impl FuturesClient for TimedExchange {
  async fn create_order(&self, request: &OrderRequest) -> Result<OrderResult, TradingError> {
    self.calls.lock().unwrap().push((self.start.elapsed(), request.clone()));
    Ok(OrderResult { order_id: Some(1), status: Some("FILLED".into()), ..Default::default() })
  }

  async fn cancel_all_open_orders(&self, _symbol: &str) -> Result<CancelAllResult, TradingError> {
    unreachable!("TWAP never cancels")
  }

  async fn cancel_order(&self, _symbol: &str, _order_id: i64) -> Result<OrderResult, TradingError> {
    unreachable!("TWAP never cancels")
  }

  async fn account_balance(&self) -> Result<Vec<AccountBalance>, TradingError> {
    Ok(Vec::new())
  }
}

#[tokio::test(start_paused = true)]
async fn test_three_slices_with_two_waits() {
  let exchange = TimedExchange::new();
  let started = Instant::now();

  let report = place_twap_order(&exchange, "BTCUSDT", "BUY", 10.0, 30, 10, TwapOptions::default())
    .await
    .unwrap();

  // 마지막 주문 뒤에는 대기하지 않음
  assert_eq!(started.elapsed().as_secs(), 20);

  let calls = exchange.calls();
  assert_eq!(calls.len(), 3);
  let offsets: Vec<u64> = calls.iter().map(|(t, _)| t.as_secs()).collect();
  assert_eq!(offsets, vec![0, 10, 20]);
  for (_, req) in &calls {
    assert_eq!(req.order_type, OrderType::Market);
    assert_eq!(req.side, OrderSide::Buy);
    assert_eq!(req.quantity, 10.0 / 3.0);
  }

  assert_eq!(report.planned, 3);
  assert_eq!(report.attempted(), 3);
  assert_eq!(report.failed, 0);
  assert!(!report.cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_interval_longer_than_duration_sends_nothing() {
  let exchange = MockExchange::new();
  let result = place_twap_order(&exchange, "BTCUSDT", "BUY", 10.0, 5, 10, TwapOptions::default()).await;

  assert!(matches!(result, Err(TradingError::InvalidInput(_))));
  assert!(exchange.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_non_positive_timing_sends_nothing() {
  let exchange = MockExchange::new();
  assert!(place_twap_order(&exchange, "BTCUSDT", "SELL", 1.0, 0, 10, TwapOptions::default()).await.is_err());
  assert!(place_twap_order(&exchange, "BTCUSDT", "SELL", 1.0, 60, -5, TwapOptions::default()).await.is_err());
  assert!(exchange.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_slice_does_not_abort() {
  let exchange = MockExchange::new();
  exchange.fail_order(2, TradingError::RemoteRejection { status: 400, code: -1111, message: "Precision is over the maximum defined for this asset.".into() });

  let report = place_twap_order(&exchange, "ETHUSDT", "SELL", 3.0, 40, 10, TwapOptions::default())
    .await
    .unwrap();

  assert_eq!(exchange.submitted().len(), 4);
  assert_eq!(report.attempted(), 4);
  assert_eq!(report.submitted.len(), 3);
  assert_eq!(report.failed, 1);
  assert_eq!(report.executed_quantity(), 3.0 * 0.75);
}

#[tokio::test(start_paused = true)]
async fn test_step_size_rounds_slices() {
  let exchange = MockExchange::new();
  let options = TwapOptions { quantity_step: Some(0.001), ..Default::default() };

  place_twap_order(&exchange, "BTCUSDT", "BUY", 1.0, 3, 1, options).await.unwrap();

  let quantities: Vec<f64> = exchange.submitted().iter().map(|r| r.quantity).collect();
  assert_eq!(quantities, vec![0.333, 0.333, 0.334]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_remaining_slices() {
  let exchange = MockExchange::new();
  let (handle, stop) = TwapHandle::channel();
  let options = TwapOptions { stop, ..Default::default() };

  let twap = place_twap_order(&exchange, "BTCUSDT", "BUY", 5.0, 50, 10, options);
  let stopper = async {
    tokio::time::sleep(Duration::from_secs(15)).await;
    handle.stop();
  };
  let (result, _) = tokio::join!(twap, stopper);
  let report = result.unwrap();

  // t=0, t=10 두 번 실행 후 t=15에 중지
  assert!(report.cancelled);
  assert_eq!(report.planned, 5);
  assert_eq!(report.attempted(), 2);
  assert_eq!(exchange.submitted().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stopped_before_start_sends_nothing() {
  let exchange = MockExchange::new();
  let (handle, stop) = TwapHandle::channel();
  handle.stop();

  let report = place_twap_order(&exchange, "BTCUSDT", "BUY", 1.0, 30, 10, TwapOptions { stop, ..Default::default() })
    .await
    .unwrap();
  assert!(report.cancelled);
  assert_eq!(report.attempted(), 0);
}

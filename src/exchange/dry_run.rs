use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::TradingError;
use crate::exchange::traits::FuturesClient;
use crate::models::account::AccountBalance;
use crate::models::order::{CancelAllResult, OrderRequest, OrderResult};

/// A no-op exchange connector that logs orders without sending them
pub struct DryRunExchange {
  next_id: AtomicI64,
}

impl DryRunExchange {
  pub fn new() -> Self {
    Self { next_id: AtomicI64::new(1) }
  }
}

impl Default for DryRunExchange {
  fn default() -> Self { Self::new() }
}

#[async_trait]
impl FuturesClient for DryRunExchange {
  async fn create_order(&self, request: &OrderRequest) -> Result<OrderResult, TradingError> {
    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
    log::info!("[DRY-RUN] {} {} {} {}", request.order_type, request.side, request.quantity, request.symbol);
    Ok(OrderResult {
      order_id: Some(id),
      client_order_id: Some(request.client_order_id.clone().unwrap_or_else(|| format!("dry-{}", id))),
      symbol: Some(request.symbol.clone()),
      status: Some("NEW".to_string()),
      side: Some(request.side.to_string()),
      order_type: Some(request.order_type.to_string()),
      orig_qty: Some(request.quantity.to_string()),
      executed_qty: Some("0".to_string()),
      price: request.price.map(|p| p.to_string()),
      stop_price: request.stop_price.map(|p| p.to_string()),
      reduce_only: Some(request.reduce_only),
      ..Default::default()
    })
  }

  async fn cancel_all_open_orders(&self, symbol: &str) -> Result<CancelAllResult, TradingError> {
    log::info!("[DRY-RUN] cancel all open orders on {}", symbol);
    Ok(CancelAllResult { code: 200, msg: "The operation of cancel all open order is done.".into() })
  }

  async fn cancel_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, TradingError> {
    log::info!("[DRY-RUN] cancel order {} on {}", order_id, symbol);
    Ok(OrderResult {
      order_id: Some(order_id),
      symbol: Some(symbol.to_string()),
      status: Some("CANCELED".to_string()),
      ..Default::default()
    })
  }

  async fn account_balance(&self) -> Result<Vec<AccountBalance>, TradingError> {
    Ok(vec![AccountBalance::new("USDT", "0", Some("0"))])
  }
}

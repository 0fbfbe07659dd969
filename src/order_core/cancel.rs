use crate::error::TradingError;
use crate::exchange::traits::FuturesClient;
use crate::models::order::CancelAllResult;
use crate::order_core::validator::validate_symbol;
use crate::utils::logging;

/// 심볼의 모든 미체결 주문 취소
pub async fn cancel_all_orders(client: &dyn FuturesClient, symbol: &str) -> Result<CancelAllResult, TradingError> {
  let result = async {
    let symbol = validate_symbol(symbol)?;
    log::info!("Cancelling all open orders for {}...", symbol);
    client.cancel_all_open_orders(&symbol).await
  }
  .await;

  match &result {
    Ok(ack) => log::info!("All open orders cancelled successfully. ({} {})", ack.code, ack.msg),
    Err(e) => logging::log_failure("Cancel All", e),
  }
  result
}

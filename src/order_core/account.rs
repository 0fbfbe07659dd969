use crate::error::TradingError;
use crate::exchange::traits::FuturesClient;
use crate::models::account::AccountBalance;
use crate::utils::logging;

/// 잔고 조회로 연결 상태 확인
///
/// 자산이 계좌에 없으면 `Ok(None)`.
pub async fn check_balance(client: &dyn FuturesClient, asset: &str) -> Result<Option<AccountBalance>, TradingError> {
  let balances = match client.account_balance().await {
    Ok(b) => b,
    Err(e) => {
      logging::log_failure("Connection Failed", &e);
      return Err(e);
    }
  };

  let wanted = asset.to_uppercase();
  let found = balances.into_iter().find(|b| b.asset == wanted);
  match &found {
    Some(b) => {
      log::info!("Connection Successful!");
      log::info!("Wallet Balance: {}", b.balance);
      log::info!("Available Balance: {}", b.available_balance.as_deref().unwrap_or("N/A"));
    }
    None => log::info!("Connection Successful! Could not find {} balance.", wanted),
  }
  Ok(found)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::exchange::mocks::MockExchange;

  #[tokio::test]
  async fn test_finds_requested_asset() {
    let exchange = MockExchange::new();
    let usdt = check_balance(&exchange, "usdt").await.unwrap().unwrap();
    assert_eq!(usdt.balance, "50000.0");
    assert_eq!(usdt.available_balance.as_deref(), Some("48000.0"));
  }

  #[tokio::test]
  async fn test_missing_asset_is_not_an_error() {
    let exchange = MockExchange::new().with_balances(vec![AccountBalance::new("BNB", "1", None)]);
    assert!(check_balance(&exchange, "USDT").await.unwrap().is_none());
  }
}

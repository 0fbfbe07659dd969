use async_trait::async_trait;

use crate::error::TradingError;
use crate::models::account::AccountBalance;
use crate::models::order::{CancelAllResult, OrderRequest, OrderResult};

/// The `FuturesClient` trait defines the remote order capability of a futures exchange.
/// It is implemented by the Binance connector, the dry-run connector and the test mock.
#[async_trait]
pub trait FuturesClient: Send + Sync {
    /// Submit a new order and return the exchange response unchanged
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResult, TradingError>;

    /// Cancel every open order on a symbol
    async fn cancel_all_open_orders(&self, symbol: &str) -> Result<CancelAllResult, TradingError>;

    /// Cancel a single order by exchange id
    async fn cancel_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, TradingError>;

    /// Get futures account balances
    async fn account_balance(&self) -> Result<Vec<AccountBalance>, TradingError>;
}

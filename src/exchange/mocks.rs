use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TradingError;
use crate::exchange::traits::FuturesClient;
use crate::models::account::AccountBalance;
use crate::models::order::{CancelAllResult, OrderRequest, OrderResult, OrderType};

/// A recording implementation of the FuturesClient trait for testing and development
///
/// Every `create_order` call is recorded, including the ones scripted to fail.
pub struct MockExchange {
    orders: Mutex<Vec<OrderRequest>>,
    cancelled: Mutex<Vec<(String, i64)>>,
    cancel_all_calls: Mutex<Vec<String>>,
    order_failures: Mutex<HashMap<usize, TradingError>>,
    cancel_failure: Mutex<Option<TradingError>>,
    cancel_all_failure: Mutex<Option<TradingError>>,
    balance_failure: Mutex<Option<TradingError>>,
    balances: Vec<AccountBalance>,
    order_id_counter: Mutex<i64>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            cancel_all_calls: Mutex::new(Vec::new()),
            order_failures: Mutex::new(HashMap::new()),
            cancel_failure: Mutex::new(None),
            cancel_all_failure: Mutex::new(None),
            balance_failure: Mutex::new(None),
            balances: vec![
                AccountBalance::new("BNB", "0.5", Some("0.5")),
                AccountBalance::new("USDT", "50000.0", Some("48000.0")),
            ],
            order_id_counter: Mutex::new(1000),
        }
    }

    pub fn with_balances(mut self, balances: Vec<AccountBalance>) -> Self {
        self.balances = balances;
        self
    }

    /// The `call`-th create_order (1-based) returns `error` instead of an order
    pub fn fail_order(&self, call: usize, error: TradingError) {
        lock(&self.order_failures).insert(call, error);
    }

    /// The next cancel_order call returns `error`
    pub fn fail_cancel(&self, error: TradingError) {
        *lock(&self.cancel_failure) = Some(error);
    }

    /// The next cancel_all_open_orders call returns `error`
    pub fn fail_cancel_all(&self, error: TradingError) {
        *lock(&self.cancel_all_failure) = Some(error);
    }

    /// The next account_balance call returns `error`
    pub fn fail_balance(&self, error: TradingError) {
        *lock(&self.balance_failure) = Some(error);
    }

    /// Every order request seen so far, in submission order
    pub fn submitted(&self) -> Vec<OrderRequest> {
        lock(&self.orders).clone()
    }

    pub fn cancelled_orders(&self) -> Vec<(String, i64)> {
        lock(&self.cancelled).clone()
    }

    pub fn cancel_all_calls(&self) -> Vec<String> {
        lock(&self.cancel_all_calls).clone()
    }

    fn generate_order_id(&self) -> i64 {
        let mut counter = lock(&self.order_id_counter);
        *counter += 1;
        *counter
    }
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl FuturesClient for MockExchange {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResult, TradingError> {
        let call = {
            let mut orders = lock(&self.orders);
            orders.push(request.clone());
            orders.len()
        };
        if let Some(err) = lock(&self.order_failures).remove(&call) {
            return Err(err);
        }

        // Market orders fill immediately, everything else rests as NEW
        let (status, executed) = match request.order_type {
            OrderType::Market => ("FILLED", request.quantity.to_string()),
            _ => ("NEW", "0".to_string()),
        };
        Ok(OrderResult {
            order_id: Some(self.generate_order_id()),
            client_order_id: Some(
                request.client_order_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
            ),
            symbol: Some(request.symbol.clone()),
            status: Some(status.to_string()),
            side: Some(request.side.to_string()),
            order_type: Some(request.order_type.to_string()),
            orig_qty: Some(request.quantity.to_string()),
            executed_qty: Some(executed),
            price: request.price.map(|p| p.to_string()),
            stop_price: request.stop_price.map(|p| p.to_string()),
            reduce_only: Some(request.reduce_only),
            ..Default::default()
        })
    }

    async fn cancel_all_open_orders(&self, symbol: &str) -> Result<CancelAllResult, TradingError> {
        lock(&self.cancel_all_calls).push(symbol.to_string());
        if let Some(err) = lock(&self.cancel_all_failure).take() {
            return Err(err);
        }
        Ok(CancelAllResult { code: 200, msg: "The operation of cancel all open order is done.".into() })
    }

    async fn cancel_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, TradingError> {
        if let Some(err) = lock(&self.cancel_failure).take() {
            return Err(err);
        }
        lock(&self.cancelled).push((symbol.to_string(), order_id));
        Ok(OrderResult {
            order_id: Some(order_id),
            symbol: Some(symbol.to_string()),
            status: Some("CANCELED".to_string()),
            ..Default::default()
        })
    }

    async fn account_balance(&self) -> Result<Vec<AccountBalance>, TradingError> {
        if let Some(err) = lock(&self.balance_failure).take() {
            return Err(err);
        }
        Ok(self.balances.clone())
    }
}

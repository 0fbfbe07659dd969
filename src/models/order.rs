use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// 포지션을 닫는 반대 방향
    pub fn opposite(&self) -> OrderSide {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    StopMarket,
    TakeProfitMarket,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopMarket => "STOP_MARKET",
            OrderType::TakeProfitMarket => "TAKE_PROFIT_MARKET",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good Till Cancelled
    #[default]
    Gtc,
    /// Immediate Or Cancel
    Ioc,
    /// Fill Or Kill
    Fok,
    /// Good Till Crossing (post only)
    Gtx,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
            TimeInForce::Gtx => "GTX",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GTC" => Ok(TimeInForce::Gtc),
            "IOC" => Ok(TimeInForce::Ioc),
            "FOK" => Ok(TimeInForce::Fok),
            "GTX" => Ok(TimeInForce::Gtx),
            other => Err(format!("unknown time in force: {}", other)),
        }
    }
}

/// 거래소로 보내는 주문 요청. 호출마다 새로 만들고 보관하지 않는다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: Option<f64>,
    pub stop_price: Option<f64>,
    pub time_in_force: Option<TimeInForce>,
    pub reduce_only: bool,
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        quantity: f64,
    ) -> Self {
        OrderRequest {
            symbol: symbol.into(),
            side,
            order_type,
            quantity,
            price: None,
            stop_price: None,
            time_in_force: None,
            reduce_only: false,
            client_order_id: None,
        }
    }

    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: f64) -> Self {
        Self::new(symbol, side, OrderType::Market, quantity)
    }

    pub fn limit(symbol: impl Into<String>, side: OrderSide, quantity: f64, price: f64) -> Self {
        Self::new(symbol, side, OrderType::Limit, quantity)
            .with_price(price)
            .with_time_in_force(TimeInForce::Gtc)
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stop_price(mut self, stop_price: f64) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = true;
        self
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }
}

/// 거래소 주문 응답
///
/// 로그에 쓰는 필드만 타입으로 꺼내고 나머지는 `extra`에 그대로 보존한다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algo_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_qty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_qty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderResult {
    /// 로그용 식별자. 조건부 주문은 orderId 대신 algoId만 돌려줄 때가 있다.
    pub fn display_id(&self) -> String {
        match (self.order_id, self.algo_id, &self.client_order_id) {
            (Some(id), _, _) => id.to_string(),
            (None, Some(id), _) => id.to_string(),
            (None, None, Some(cid)) => cid.clone(),
            _ => "N/A".to_string(),
        }
    }

    pub fn status_str(&self) -> &str {
        self.status.as_deref().unwrap_or("UNKNOWN")
    }

    /// 체결 수량. 응답에 없거나 숫자가 아니면 0
    pub fn executed_quantity(&self) -> f64 {
        self.executed_qty
            .as_deref()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

/// 전체 미체결 주문 취소 응답
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancelAllResult {
    pub code: i64,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_side() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }

    #[test]
    fn test_order_result_keeps_unknown_fields() {
        let raw = r#"{
            "orderId": 4012345,
            "symbol": "BTCUSDT",
            "status": "NEW",
            "clientOrderId": "abc",
            "type": "MARKET",
            "origQty": "0.010",
            "executedQty": "0.000",
            "reduceOnly": false,
            "positionSide": "BOTH",
            "updateTime": 1700000000000
        }"#;
        let result: OrderResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.order_id, Some(4012345));
        assert_eq!(result.order_type.as_deref(), Some("MARKET"));
        assert_eq!(result.status_str(), "NEW");
        assert_eq!(result.extra.get("positionSide"), Some(&Value::from("BOTH")));
        assert_eq!(result.executed_quantity(), 0.0);
    }

    #[test]
    fn test_display_id_falls_back_to_algo_id() {
        let result = OrderResult { algo_id: Some(77), ..Default::default() };
        assert_eq!(result.display_id(), "77");
        assert_eq!(OrderResult::default().display_id(), "N/A");
    }

    #[test]
    fn test_limit_builder_defaults_to_gtc() {
        let req = OrderRequest::limit("BTCUSDT", OrderSide::Buy, 1.0, 30000.0);
        assert_eq!(req.order_type, OrderType::Limit);
        assert_eq!(req.time_in_force, Some(TimeInForce::Gtc));
        assert_eq!(req.price, Some(30000.0));
        assert!(!req.reduce_only);
    }
}

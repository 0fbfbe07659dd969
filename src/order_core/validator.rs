//! 주문 입력 검증
//!
//! 검증 실패는 항상 `TradingError::InvalidInput`이며 거래소 호출 전에 걸러진다.

use crate::error::TradingError;
use crate::models::order::OrderSide;

/// 심볼 최소 길이 (예: BTCUSDT)
const MIN_SYMBOL_LEN: usize = 5;

/// 숫자로 해석 가능한 입력
pub trait NumericInput {
    fn to_number(&self) -> Option<f64>;
}

impl NumericInput for f64 {
    fn to_number(&self) -> Option<f64> {
        Some(*self)
    }
}

impl NumericInput for i64 {
    fn to_number(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl NumericInput for &str {
    fn to_number(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok()
    }
}

impl NumericInput for String {
    fn to_number(&self) -> Option<f64> {
        self.as_str().to_number()
    }
}

/// 심볼 형식 검증 후 대문자로 반환
pub fn validate_symbol(raw: &str) -> Result<String, TradingError> {
    if raw.chars().count() < MIN_SYMBOL_LEN {
        return Err(TradingError::InvalidInput(format!("Invalid symbol format: {}", raw)));
    }
    Ok(raw.to_ascii_uppercase())
}

/// 주문 방향 검증 (대소문자 무시)
pub fn validate_side(raw: &str) -> Result<OrderSide, TradingError> {
    match raw.to_uppercase().as_str() {
        "BUY" => Ok(OrderSide::Buy),
        "SELL" => Ok(OrderSide::Sell),
        _ => Err(TradingError::InvalidInput(format!(
            "Invalid side: {}. Must be BUY or SELL.",
            raw
        ))),
    }
}

/// 양수 검증. 수량과 가격 필드에 공통으로 사용
pub fn validate_positive_quantity<T: NumericInput>(raw: T, field_name: &str) -> Result<f64, TradingError> {
    let value = raw
        .to_number()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TradingError::InvalidInput(format!("Invalid {}: not a number", field_name)))?;
    if value <= 0.0 {
        return Err(TradingError::InvalidInput(format!(
            "Invalid {}: {} must be greater than 0.",
            field_name, field_name
        )));
    }
    Ok(value)
}

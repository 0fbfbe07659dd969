//! 바이낸스 선물 주문 봇 라이브러리
//!
//! 시장가/지정가 주문, OCO(손절+익절), TWAP 분할 실행과 전체 주문 취소를 지원합니다.

pub mod config;
pub mod error;
pub mod exchange;
pub mod models;
pub mod order_core;
pub mod strategies;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::{ErrorCategory, TradingError};
pub use crate::exchange::traits::FuturesClient;
pub use crate::models::order::{OrderRequest, OrderResult, OrderSide, OrderType, TimeInForce};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

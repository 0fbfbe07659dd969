/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::fmt;

use thiserror::Error;

/// 로그 태그로 사용하는 오류 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    RemoteRejection,
    RemoteOrderError,
    Unexpected,
}

impl ErrorCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "Validation Error",
            ErrorCategory::RemoteRejection => "Binance API Error",
            ErrorCategory::RemoteOrderError => "Binance Order Error",
            ErrorCategory::Unexpected => "Unexpected Error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug)]
pub enum TradingError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{status} - code {code}: {message}")]
    RemoteRejection {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("code {code}: {message}")]
    RemoteOrderError {
        code: i64,
        message: String,
    },

    #[error("{0}")]
    Unexpected(String),

    #[error("{leg} leg failed (stop leg cancelled: {compensated}): {source}")]
    OcoLegFailed {
        leg: &'static str,
        compensated: bool,
        #[source]
        source: Box<TradingError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TradingError {
    /// 오류 분류 조회
    ///
    /// OCO 부분 실패는 원인 오류의 분류를 따른다.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TradingError::InvalidInput(_) => ErrorCategory::InvalidInput,
            TradingError::RemoteRejection { .. } => ErrorCategory::RemoteRejection,
            TradingError::RemoteOrderError { .. } => ErrorCategory::RemoteOrderError,
            TradingError::OcoLegFailed { source, .. } => source.category(),
            TradingError::Unexpected(_) | TradingError::Config(_) => ErrorCategory::Unexpected,
        }
    }
}

impl From<reqwest::Error> for TradingError {
    fn from(e: reqwest::Error) -> Self {
        TradingError::Unexpected(format!("http error: {}", e))
    }
}

impl From<serde_json::Error> for TradingError {
    fn from(e: serde_json::Error) -> Self {
        TradingError::Unexpected(format!("serialization error: {}", e))
    }
}

impl From<std::io::Error> for TradingError {
    fn from(e: std::io::Error) -> Self {
        TradingError::Unexpected(format!("io error: {}", e))
    }
}

impl From<config::ConfigError> for TradingError {
    fn from(e: config::ConfigError) -> Self {
        TradingError::Config(e.to_string())
    }
}

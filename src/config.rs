/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TradingError;

pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";
pub const LIVE_BASE_URL: &str = "https://fapi.binance.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub logging: LoggingConfig,
    pub execution: ExecutionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub testnet: bool,
    pub base_url: Option<String>,
    pub recv_window_ms: u64,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// TWAP 분할 수량을 맞출 거래소 step size. 없으면 반올림하지 않음
    pub quantity_step: Option<f64>,
    /// OCO 익절 주문 실패 시 손절 주문 취소 여부
    pub oco_compensate: bool,
}

impl Config {
    /// Load configuration from `config.toml` in the working directory
    pub fn load() -> Result<Self, TradingError> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration: defaults, then the optional file, then `BOT__*` env vars,
    /// then the legacy `BINANCE_*` variables
    pub fn load_from(path: &Path) -> Result<Self, TradingError> {
        let defaults = Config::default();

        let builder = config::Config::builder()
            .set_default("exchange.testnet", defaults.exchange.testnet)?
            .set_default("exchange.recv_window_ms", defaults.exchange.recv_window_ms as i64)?
            .set_default("exchange.timeout_ms", defaults.exchange.timeout_ms as i64)?
            .set_default("logging.level", defaults.logging.level.clone())?
            .set_default("logging.file_path", defaults.logging.file_path.clone())?
            .set_default("execution.oco_compensate", defaults.execution.oco_compensate)?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("BOT")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder
            .build()?
            .try_deserialize()
            .map_err(|e| TradingError::Config(format!("Failed to parse config: {}", e)))?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Apply environment variable overrides for credentials and network selection
    fn apply_env_overrides(&mut self) {
        use std::env;
        if let Ok(v) = env::var("BINANCE_API_KEY") { if !v.is_empty() { self.exchange.api_key = Some(v); } }
        if let Ok(v) = env::var("BINANCE_API_SECRET") { if !v.is_empty() { self.exchange.api_secret = Some(v); } }
        if let Ok(v) = env::var("BINANCE_BASE_URL") { if !v.is_empty() { self.exchange.base_url = Some(v); } }
        if let Ok(v) = env::var("BINANCE_TESTNET") {
            let lower = v.to_lowercase();
            if ["1","true","yes"].contains(&lower.as_str()) { self.exchange.testnet = true; }
            if ["0","false","no"].contains(&lower.as_str()) { self.exchange.testnet = false; }
        }
    }

    /// API 키와 시크릿이 모두 있어야 한다
    pub fn require_credentials(&self) -> Result<(String, String), TradingError> {
        match (&self.exchange.api_key, &self.exchange.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Ok((key.clone(), secret.clone()))
            }
            _ => Err(TradingError::Config(
                "API credentials not found. Please set BINANCE_API_KEY and BINANCE_API_SECRET in .env file.".to_string(),
            )),
        }
    }
}

impl ExchangeConfig {
    /// 명시된 base_url이 우선, 없으면 testnet 여부로 결정
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.testnet => TESTNET_BASE_URL.to_string(),
            None => LIVE_BASE_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exchange: ExchangeConfig {
                api_key: None,
                api_secret: None,
                testnet: true,
                base_url: None,
                recv_window_ms: 5000,
                timeout_ms: 10_000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: Some("bot.log".to_string()),
            },
            execution: ExecutionConfig {
                quantity_step: None,
                oco_compensate: true,
            },
        }
    }
}

//! 로깅 유틸리티
//!
//! 콘솔(메시지만)과 로그 파일(타임스탬프 포함)에 동시에 기록한다.
//! 코드 전체는 `log` 매크로를 쓰고, tracing-subscriber가 이를 받아 두 레이어로 내보낸다.
//! `init`이 돌려주는 `LogGuard`가 살아있는 동안 파일 writer가 동작하고, drop 시 flush 된다.

use std::fmt;
use std::path::Path;

use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::TradingError;
use crate::models::order::OrderResult;

/// 로그 파일 수명 관리. drop 시 남은 로그를 파일에 쓰고 닫는다
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// 파일 로그 한 줄: `timestamp - LEVEL - message`
pub struct FileFormat;

impl<S, N> FormatEvent<S, N> for FileFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn file_appender(path: &str) -> Result<RollingFileAppender, TradingError> {
    let path = Path::new(path);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TradingError::Config(format!("invalid log file path: {}", path.display())))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .map_err(|e| TradingError::Config(format!("cannot open log file {}: {}", path.display(), e)))
}

/// 로깅 시스템 초기화
///
/// `RUST_LOG`가 있으면 그 필터를, 없으면 설정의 레벨을 쓴다.
pub fn init(cfg: &LoggingConfig) -> Result<LogGuard, TradingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));

    let console_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stdout);

    let (file_layer, file_guard) = match &cfg.file_path {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let layer = tracing_subscriber::fmt::layer()
                .event_format(FileFormat)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| TradingError::Config(format!("logger already initialised: {}", e)))?;

    log::debug!("로깅 시스템 초기화 완료: 레벨 = {}", cfg.level);

    Ok(LogGuard { _file: file_guard })
}

/// 전략 시작 로그
pub fn log_strategy_start(strategy_name: &str, symbol: &str) {
    log::info!("전략 시작: {} - 심볼: {}", strategy_name, symbol);
}

/// 전략 종료 로그
pub fn log_strategy_end(strategy_name: &str, symbol: &str, result: &str) {
    log::info!("전략 종료: {} - 심볼: {} - 결과: {}", strategy_name, symbol, result);
}

/// 주문 성공 로그
pub fn log_order_placed(kind: &str, order: &OrderResult) {
    log::info!(
        "{} Placed Successfully: ID {}, Status: {}",
        kind,
        order.display_id(),
        order.status_str()
    );
}

/// 분류 태그가 붙은 오류 로그 한 줄
pub fn log_failure(context: &str, error: &TradingError) {
    log::error!("[{}] {}: {}", context, error.category(), error);
}

//! TWAP 전략
//!
//! 총 수량을 `floor(duration / interval)`개의 시장가 주문으로 나눠 일정 간격으로 실행한다.
//! 개별 주문 실패는 로그만 남기고 다음 분할로 넘어간다. 재시도는 없다.

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use crate::error::TradingError;
use crate::exchange::traits::FuturesClient;
use crate::models::order::{OrderResult, OrderSide};
use crate::order_core::market::place_market_order;
use crate::order_core::validator::{validate_positive_quantity, validate_side, validate_symbol};
use crate::utils::{logging, math};

/// TWAP 실행 계획
#[derive(Debug, Clone, PartialEq)]
pub struct TwapPlan {
    /// 분할 주문 수
    pub order_count: usize,
    /// 분할당 수량 (반올림 전)
    pub quantity_per_order: f64,
    /// step 단위로 맞춘 `(일반 조각, 마지막 조각)`. 없으면 모두 `quantity_per_order`
    pub stepped: Option<(f64, f64)>,
    /// 주문 간격
    pub interval: Duration,
}

impl TwapPlan {
    /// 실행 계획 생성. 주문 수가 0이면 아무것도 보내지 않고 실패한다
    pub fn new(
        total_quantity: f64,
        duration_seconds: i64,
        interval_seconds: i64,
        quantity_step: Option<f64>,
    ) -> Result<Self, TradingError> {
        if duration_seconds <= 0 || interval_seconds <= 0 {
            return Err(TradingError::InvalidInput("Duration and interval must be positive.".to_string()));
        }

        let order_count = usize::try_from(duration_seconds / interval_seconds)
            .map_err(|_| TradingError::InvalidInput("Too many orders for this duration.".to_string()))?;
        if order_count == 0 {
            return Err(TradingError::InvalidInput("Duration too short for interval.".to_string()));
        }

        let stepped = match quantity_step {
            Some(step) => Some(math::step_slices(total_quantity, order_count, step).ok_or_else(|| {
                TradingError::InvalidInput(format!("Cannot split {} with step {}", total_quantity, step))
            })?),
            None => None,
        };

        Ok(TwapPlan {
            order_count,
            quantity_per_order: total_quantity / order_count as f64,
            stepped,
            interval: Duration::from_secs(interval_seconds as u64),
        })
    }

    /// `index`번째(0부터) 분할 수량
    pub fn slice_quantity(&self, index: usize) -> f64 {
        match self.stepped {
            Some((_, last)) if index + 1 == self.order_count => last,
            Some((regular, _)) => regular,
            None => self.quantity_per_order,
        }
    }
}

/// TWAP 중지 요청 송신 측
#[derive(Debug)]
pub struct TwapHandle {
    tx: watch::Sender<bool>,
}

/// TWAP 중지 요청 수신 측
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl TwapHandle {
    pub fn channel() -> (TwapHandle, StopSignal) {
        let (tx, rx) = watch::channel(false);
        (TwapHandle { tx }, StopSignal { rx: Some(rx) })
    }

    /// 남은 분할 주문 취소
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

impl StopSignal {
    /// 중지되지 않는 신호
    pub fn never() -> Self {
        StopSignal { rx: None }
    }

    pub fn is_stopped(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    async fn stopped(&mut self) {
        match self.rx.as_mut() {
            Some(rx) => loop {
                if *rx.borrow() {
                    return;
                }
                // 송신 측이 사라지면 더 이상 중지될 일이 없다
                if rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            },
            None => std::future::pending::<()>().await,
        }
    }
}

/// TWAP 실행 결과
#[derive(Debug, Clone, Serialize)]
pub struct TwapReport {
    pub planned: usize,
    pub quantity_per_order: f64,
    pub submitted: Vec<OrderResult>,
    pub failed: usize,
    pub cancelled: bool,
}

impl TwapReport {
    pub fn attempted(&self) -> usize {
        self.submitted.len() + self.failed
    }

    /// 거래소 응답 기준 체결 수량 합
    pub fn executed_quantity(&self) -> f64 {
        self.submitted.iter().map(|o| o.executed_quantity()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct TwapOptions {
    /// 분할 수량을 맞출 step size
    pub quantity_step: Option<f64>,
    pub stop: StopSignal,
}

impl Default for TwapOptions {
    fn default() -> Self {
        TwapOptions { quantity_step: None, stop: StopSignal::never() }
    }
}

/// TWAP 전략 실행
///
/// 계획 단계에서 실패하면 `Err`이고 주문은 하나도 나가지 않는다. 그 이후의 분할 실패는
/// `TwapReport::failed`에만 반영된다.
pub async fn place_twap_order(
    client: &dyn FuturesClient,
    symbol: &str,
    side: &str,
    total_quantity: f64,
    duration_seconds: i64,
    interval_seconds: i64,
    options: TwapOptions,
) -> Result<TwapReport, TradingError> {
    let prepared = prepare(symbol, side, total_quantity, duration_seconds, interval_seconds, &options);
    let (symbol, side, plan) = match prepared {
        Ok(p) => p,
        Err(e) => {
            logging::log_failure("TWAP", &e);
            return Err(e);
        }
    };

    log::info!(
        "Starting TWAP: {} {} {} over {}s. {} orders of ~{:.6} every {}s.",
        side, total_quantity, symbol, duration_seconds, plan.order_count, plan.quantity_per_order, interval_seconds
    );
    logging::log_strategy_start("TWAP", &symbol);

    let report = execute(client, &symbol, side, &plan, options.stop).await;

    let summary = format!(
        "{}/{} orders placed, {} failed{}",
        report.submitted.len(),
        report.planned,
        report.failed,
        if report.cancelled { ", cancelled" } else { "" }
    );
    logging::log_strategy_end("TWAP", &symbol, &summary);
    log::info!("TWAP Execution Completed");
    Ok(report)
}

fn prepare(
    symbol: &str,
    side: &str,
    total_quantity: f64,
    duration_seconds: i64,
    interval_seconds: i64,
    options: &TwapOptions,
) -> Result<(String, OrderSide, TwapPlan), TradingError> {
    let symbol = validate_symbol(symbol)?;
    let side = validate_side(side)?;
    let total_quantity = validate_positive_quantity(total_quantity, "total_quantity")?;
    let plan = TwapPlan::new(total_quantity, duration_seconds, interval_seconds, options.quantity_step)?;
    Ok((symbol, side, plan))
}

async fn execute(
    client: &dyn FuturesClient,
    symbol: &str,
    side: OrderSide,
    plan: &TwapPlan,
    mut stop: StopSignal,
) -> TwapReport {
    let mut report = TwapReport {
        planned: plan.order_count,
        quantity_per_order: plan.quantity_per_order,
        submitted: Vec::new(),
        failed: 0,
        cancelled: false,
    };

    for i in 0..plan.order_count {
        if stop.is_stopped() {
            report.cancelled = true;
            break;
        }

        log::info!("TWAP Order {}/{}", i + 1, plan.order_count);
        match place_market_order(client, symbol, side.as_str(), plan.slice_quantity(i)).await {
            Ok(order) => report.submitted.push(order),
            Err(_) => report.failed += 1,
        }

        if i + 1 < plan.order_count {
            tokio::select! {
                _ = sleep(plan.interval) => {}
                _ = stop.stopped() => {
                    log::warn!("TWAP stopped after {}/{} orders", i + 1, plan.order_count);
                    report.cancelled = true;
                    break;
                }
            }
        }
    }

    report
}

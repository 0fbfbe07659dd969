pub mod oco;
pub mod twap;

// 핵심 전략 재노출
pub use oco::{place_oco_order, OcoOptions, OcoResult};
pub use twap::{place_twap_order, StopSignal, TwapHandle, TwapOptions, TwapPlan, TwapReport};

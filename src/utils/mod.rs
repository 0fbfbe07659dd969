//! 공용 유틸리티

pub mod logging;
pub mod math;

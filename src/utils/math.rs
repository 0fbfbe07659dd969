//! 수량 관련 유틸리티
//!
//! 거래소 step size 맞춤은 부동소수 오차를 피하려고 Decimal로 계산한다.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// 수량 단위 내림 (거래소 요구사항에 맞춰)
///
/// step이 0 이하이거나 Decimal로 표현할 수 없으면 None
pub fn round_quantity(quantity: f64, step_size: f64) -> Option<f64> {
  let q = Decimal::from_f64(quantity)?;
  let step = Decimal::from_f64(step_size)?;
  if step <= Decimal::ZERO {
    return None;
  }
  ((q / step).floor() * step).normalize().to_f64()
}

/// step 단위로 나눈 분할 수량. `(일반 조각, 마지막 조각)`
///
/// 일반 조각은 `total / count`를 step 단위로 내린 값이고 마지막 조각이 나머지를 가져간다.
/// 조각 목록을 만들지 않으므로 `count`가 아주 커도 된다. 조각이 step보다 작으면 None
pub fn step_slices(total: f64, count: usize, step_size: f64) -> Option<(f64, f64)> {
  if count == 0 {
    return None;
  }
  let rounded = Decimal::from_f64(round_quantity(total / count as f64, step_size)?)?;
  if rounded.is_zero() {
    return None;
  }
  let others = rounded.checked_mul(Decimal::from(count - 1))?;
  let last = Decimal::from_f64(total)?.checked_sub(others)?.normalize();
  if last <= Decimal::ZERO {
    return None;
  }
  Some((rounded.to_f64()?, last.to_f64()?))
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_round_quantity() {
    assert_eq!(round_quantity(1.23456, 0.01), Some(1.23));
    assert_eq!(round_quantity(1.23456, 0.001), Some(1.234));
    assert_eq!(round_quantity(50123.45, 10.0), Some(50120.0));
    assert_eq!(round_quantity(1.0, 0.0), None);
  }

  #[test]
  fn test_step_slices_last_takes_remainder() {
    let (regular, last) = step_slices(1.0, 3, 0.001).unwrap();
    assert_eq!((regular, last), (0.333, 0.334));

    let total = Decimal::from_f64(regular).unwrap() * dec!(2) + Decimal::from_f64(last).unwrap();
    assert_eq!(total, dec!(1.0));
  }

  #[test]
  fn test_step_slices_rejects_slices_below_step() {
    assert!(step_slices(0.002, 4, 0.001).is_none());
    assert!(step_slices(1.0, 0, 0.001).is_none());
    assert!(step_slices(1.0, usize::MAX, 0.001).is_none());
  }
}

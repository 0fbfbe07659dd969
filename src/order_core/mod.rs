//! 단일 주문 실행
//!
//! 각 함수는 입력을 검증하고 거래소를 한 번 호출한다.

pub mod account;
pub mod cancel;
pub mod limit;
pub mod market;
pub mod validator;

pub use account::check_balance;
pub use cancel::cancel_all_orders;
pub use limit::place_limit_order;
pub use market::place_market_order;

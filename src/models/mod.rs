pub mod account;
pub mod order;

//! Command implementations, one module per area.

pub mod account;
pub mod admin;
pub mod checkout;
pub mod reports;
pub mod shop;

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod analytics;
pub mod chain;
pub mod checkout;
pub mod config;
pub mod entities;
pub mod framework;
pub mod ledger;
pub mod swap;
pub mod tokens;
pub mod wallet;

//! Shared wire types and HTTP clients for SolPay.
//!
//! The `client` feature enables the typed HTTP clients in [`client`].

pub mod auth;
#[cfg(feature = "client")]
pub mod client;
pub mod explorer;
pub mod objects;

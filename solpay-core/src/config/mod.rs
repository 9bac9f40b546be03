//! Configuration types for SolPay.
//!
//! These are the validated runtime values. Loading and parsing the TOML file
//! happens in the server crate; the payer builds [`ChainConfig`] and
//! [`SwapConfig`] from its command line.

mod admin;
mod chain;
mod server;

pub use admin::AdminConfig;
pub use chain::{
    ChainConfig, DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_DEVNET_RPC_URL, DEFAULT_MAINNET_RPC_URL,
    SwapConfig,
};
pub use server::ServerConfig;

use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// Token catalog settings.
#[derive(Debug, Clone, Default)]
pub struct TokensConfig {
    /// Token-list document to refresh the catalog from; the built-in list is
    /// used when absent or unreachable.
    pub list_url: Option<Url>,
}

/// Shared configuration state with separate locks for each section.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: Arc<RwLock<ServerConfig>>,
    pub admin: Arc<RwLock<AdminConfig>>,
    pub tokens: Arc<RwLock<TokensConfig>>,
}

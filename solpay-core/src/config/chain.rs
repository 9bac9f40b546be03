//! Payer-side chain and swap settings.

use std::time::Duration;

use url::Url;

use crate::swap::{DEFAULT_AGGREGATOR_URL, DEFAULT_SLIPPAGE_BPS};

pub const DEFAULT_DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub devnet_rpc_url: String,
    pub mainnet_rpc_url: String,
    pub confirmation_timeout: Duration,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            devnet_rpc_url: DEFAULT_DEVNET_RPC_URL.to_string(),
            mainnet_rpc_url: DEFAULT_MAINNET_RPC_URL.to_string(),
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapConfig {
    pub aggregator_url: Url,
    pub slippage_bps: u16,
}

impl SwapConfig {
    pub fn new(aggregator_url: Url) -> Self {
        Self {
            aggregator_url,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }

    /// The public Jupiter endpoint.
    pub fn jupiter() -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(DEFAULT_AGGREGATOR_URL)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let chain = ChainConfig::default();
        assert_eq!(chain.confirmation_timeout, Duration::from_secs(60));
        let swap = SwapConfig::jupiter().unwrap();
        assert_eq!(swap.slippage_bps, 100);
        assert_eq!(swap.aggregator_url.as_str(), "https://quote-api.jup.ag/v6");
    }
}

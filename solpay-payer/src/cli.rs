use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use solpay_core::config::{ChainConfig, DEFAULT_DEVNET_RPC_URL, DEFAULT_MAINNET_RPC_URL, SwapConfig};
use solpay_core::swap::{DEFAULT_AGGREGATOR_URL, DEFAULT_SLIPPAGE_BPS};
use solpay_sdk::objects::TokenSymbol;
use url::Url;
use uuid::Uuid;

/// Pay a SolPay payment link from a local Solana keypair
#[derive(Parser, Debug)]
#[command(name = "solpay-payer")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// SolPay server base URL
    #[arg(long, env = "SOLPAY_SERVER", default_value = "http://localhost:8080")]
    pub server: Url,

    /// Keypair file written by `solana-keygen`
    #[arg(long, env = "SOLPAY_KEYPAIR")]
    pub keypair: PathBuf,

    /// Payment link id
    #[arg(long)]
    pub link: Uuid,

    /// Token to pay with (SOL, USDC, RAY, SRM, FIDA)
    #[arg(long)]
    pub token: TokenSymbol,

    #[arg(long, env = "SOLPAY_DEVNET_RPC", default_value = DEFAULT_DEVNET_RPC_URL)]
    pub devnet_rpc: String,

    #[arg(long, env = "SOLPAY_MAINNET_RPC", default_value = DEFAULT_MAINNET_RPC_URL)]
    pub mainnet_rpc: String,

    /// Swap aggregator base URL
    #[arg(long, env = "SOLPAY_AGGREGATOR", default_value = DEFAULT_AGGREGATOR_URL)]
    pub aggregator: Url,

    /// Swap slippage tolerance in basis points
    #[arg(long, default_value_t = DEFAULT_SLIPPAGE_BPS)]
    pub slippage_bps: u16,

    /// How long to wait for each transaction to confirm
    #[arg(long, default_value_t = 60)]
    pub confirmation_timeout_secs: u64,

    /// Connect the wallet without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl Args {
    pub fn chain_config(&self) -> ChainConfig {
        ChainConfig {
            devnet_rpc_url: self.devnet_rpc.clone(),
            mainnet_rpc_url: self.mainnet_rpc.clone(),
            confirmation_timeout: Duration::from_secs(self.confirmation_timeout_secs),
        }
    }

    pub fn swap_config(&self) -> SwapConfig {
        SwapConfig {
            aggregator_url: self.aggregator.clone(),
            slippage_bps: self.slippage_bps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_config() {
        let link = Uuid::new_v4();
        let args = Args::try_parse_from([
            "solpay-payer",
            "--keypair",
            "/tmp/id.json",
            "--link",
            &link.to_string(),
            "--token",
            "ray",
        ])
        .unwrap();

        assert_eq!(args.link, link);
        assert_eq!(args.token, TokenSymbol::Ray);
        assert!(!args.yes);
        assert_eq!(args.chain_config(), ChainConfig::default());
        assert_eq!(args.swap_config(), SwapConfig::jupiter().unwrap());
    }

    #[test]
    fn overrides_are_applied() {
        let args = Args::try_parse_from([
            "solpay-payer",
            "--keypair",
            "/tmp/id.json",
            "--link",
            "00000000-0000-0000-0000-000000000000",
            "--token",
            "SOL",
            "--slippage-bps",
            "50",
            "--confirmation-timeout-secs",
            "5",
            "--aggregator",
            "http://127.0.0.1:9000/v6",
            "-y",
        ])
        .unwrap();

        assert!(args.yes);
        assert_eq!(args.swap_config().slippage_bps, 50);
        assert_eq!(
            args.swap_config().aggregator_url.as_str(),
            "http://127.0.0.1:9000/v6"
        );
        assert_eq!(
            args.chain_config().confirmation_timeout,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn unknown_token_is_rejected() {
        let err = Args::try_parse_from([
            "solpay-payer",
            "--keypair",
            "/tmp/id.json",
            "--link",
            "00000000-0000-0000-0000-000000000000",
            "--token",
            "BONK",
        ]);
        assert!(err.is_err());
    }
}

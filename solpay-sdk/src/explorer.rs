//! Public block explorer links and signature checks.

use crate::objects::tokens::Network;

const EXPLORER_BASE: &str = "https://explorer.solana.com/tx/";

/// Explorer URL of a transaction signature on the given network.
pub fn explorer_tx_url(network: Network, signature: &str) -> String {
    match network {
        Network::Mainnet => format!("{EXPLORER_BASE}{signature}"),
        Network::Devnet => format!("{EXPLORER_BASE}{signature}?cluster=devnet"),
    }
}

/// A transaction signature is the base58 encoding of 64 bytes.
pub fn is_valid_signature(signature: &str) -> bool {
    bs58::decode(signature)
        .into_vec()
        .map(|bytes| bytes.len() == 64)
        .unwrap_or(false)
}

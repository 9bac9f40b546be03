//! Solana chain access: transfer construction and submit-and-confirm.

mod solana;
mod transfer;

pub use solana::SolanaRpc;
pub use transfer::{build_transfer_instructions, unsigned_transaction};

use std::time::Duration;

use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use solpay_sdk::objects::Network;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The network rejected the transaction or the RPC call failed.
    #[error("transaction submission failed: {0}")]
    Submission(String),
    /// Broadcast succeeded but confirmation was not observed in time.
    #[error("transaction {signature} was not confirmed within {waited:?}")]
    ConfirmationTimeout {
        signature: Signature,
        waited: Duration,
    },
    #[error("invalid address {0}")]
    InvalidAddress(String),
    #[error("failed to build transaction: {0}")]
    Build(String),
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn latest_blockhash(&self, network: Network) -> Result<Hash, ChainError>;

    /// Broadcast a signed transaction and wait for `confirmed` commitment.
    async fn submit_and_confirm(
        &self,
        network: Network,
        tx: &VersionedTransaction,
    ) -> Result<Signature, ChainError>;
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{TransactionError, VersionedTransaction};
use solpay_sdk::objects::Network;

use super::{ChainClient, ChainError};

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// JSON-RPC access to devnet and mainnet, one client per cluster.
#[derive(Clone)]
pub struct SolanaRpc {
    devnet: Arc<RpcClient>,
    mainnet: Arc<RpcClient>,
    confirmation_timeout: Duration,
}

impl std::fmt::Debug for SolanaRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaRpc")
            .field("devnet", &self.devnet.url())
            .field("mainnet", &self.mainnet.url())
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish()
    }
}

impl SolanaRpc {
    pub fn new(
        devnet_rpc_url: impl Into<String>,
        mainnet_rpc_url: impl Into<String>,
        confirmation_timeout: Duration,
    ) -> Self {
        let client = |url: String| {
            Arc::new(RpcClient::new_with_commitment(
                url,
                CommitmentConfig::confirmed(),
            ))
        };
        Self {
            devnet: client(devnet_rpc_url.into()),
            mainnet: client(mainnet_rpc_url.into()),
            confirmation_timeout,
        }
    }

    fn client(&self, network: Network) -> &RpcClient {
        match network {
            Network::Devnet => &self.devnet,
            Network::Mainnet => &self.mainnet,
        }
    }
}

#[async_trait]
impl ChainClient for SolanaRpc {
    async fn latest_blockhash(&self, network: Network) -> Result<Hash, ChainError> {
        self.client(network)
            .get_latest_blockhash()
            .await
            .map_err(|e| ChainError::Submission(e.to_string()))
    }

    #[tracing::instrument(skip_all, fields(%network))]
    async fn submit_and_confirm(
        &self,
        network: Network,
        tx: &VersionedTransaction,
    ) -> Result<Signature, ChainError> {
        let rpc = self.client(network);
        let signature = rpc.send_transaction(tx).await.map_err(|e| {
            tracing::warn!(error = %e, "Transaction rejected");
            ChainError::Submission(e.to_string())
        })?;
        tracing::info!(%signature, "Transaction sent, awaiting confirmation");

        match tokio::time::timeout(self.confirmation_timeout, wait_confirmed(rpc, &signature)).await {
            Ok(result) => result.map(|()| signature),
            Err(_) => {
                tracing::warn!(%signature, "Confirmation timed out");
                Err(ChainError::ConfirmationTimeout {
                    signature,
                    waited: self.confirmation_timeout,
                })
            }
        }
    }
}

async fn wait_confirmed(rpc: &RpcClient, signature: &Signature) -> Result<(), ChainError> {
    loop {
        let status = rpc
            .get_signature_status_with_commitment(signature, CommitmentConfig::confirmed())
            .await
            .map_err(|e| ChainError::Submission(e.to_string()))?;
        if let Some(outcome) = confirmation_outcome(status) {
            if let Err(e) = &outcome {
                tracing::warn!(%signature, error = %e, "Transaction failed on chain");
            }
            return outcome;
        }
        tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
    }
}

/// `None` while the cluster has not reached `confirmed` for the signature.
/// A transaction that landed with an error is a failed submission.
fn confirmation_outcome(
    status: Option<Result<(), TransactionError>>,
) -> Option<Result<(), ChainError>> {
    status.map(|result| result.map_err(|e| ChainError::Submission(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::instruction::InstructionError;

    #[test]
    fn unseen_signature_keeps_polling() {
        assert!(confirmation_outcome(None).is_none());
    }

    #[test]
    fn confirmed_success_is_ok() {
        assert!(matches!(confirmation_outcome(Some(Ok(()))), Some(Ok(()))));
    }

    #[test]
    fn on_chain_failure_is_a_submission_error() {
        // e.g. a swap that exceeded its slippage and aborted in the program
        let failed = Some(Err(TransactionError::InstructionError(
            2,
            InstructionError::Custom(6001),
        )));
        assert!(matches!(
            confirmation_outcome(failed),
            Some(Err(ChainError::Submission(reason))) if reason.contains("custom")
        ));

        let no_funds = Some(Err(TransactionError::InsufficientFundsForFee));
        assert!(matches!(
            confirmation_outcome(no_funds),
            Some(Err(ChainError::Submission(_)))
        ));
    }
}

//! Customer wallet abstraction.
//!
//! A [`Wallet`] exposes a public key after a one-shot `connect` handshake and
//! signs transactions on request. The wallet owns its session state; the
//! checkout flow only asks [`Wallet::is_connected`].

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer, read_keypair_file};
use solana_sdk::transaction::VersionedTransaction;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("no wallet is installed")]
    NotInstalled,
    #[error("wallet connection rejected: {0}")]
    ConnectionRejected(String),
    #[error("wallet is not connected")]
    NotConnected,
    #[error("signing failed: {0}")]
    Signing(String),
}

#[async_trait]
pub trait Wallet: Send + Sync {
    /// Ask the wallet to expose its public key.
    async fn connect(&self) -> Result<Pubkey, WalletError>;

    fn is_connected(&self) -> bool;

    fn public_key(&self) -> Option<Pubkey>;

    /// Add this wallet's signature to `tx`, leaving other signatures intact.
    async fn sign_transaction(
        &self,
        tx: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError>;

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError>;
}

/// Decides whether a connection request for the given key is accepted.
pub type ConnectApproval = Arc<dyn Fn(&Pubkey) -> bool + Send + Sync>;

/// A wallet backed by a `solana-keygen` keypair file (a JSON byte array).
pub struct KeypairWallet {
    path: PathBuf,
    approval: ConnectApproval,
    keypair: OnceLock<Keypair>,
}

impl std::fmt::Debug for KeypairWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairWallet")
            .field("path", &self.path)
            .field("public_key", &self.public_key())
            .finish()
    }
}

impl KeypairWallet {
    /// A wallet that approves every connection request.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_approval(path, Arc::new(|_: &Pubkey| true))
    }

    pub fn with_approval(path: impl Into<PathBuf>, approval: ConnectApproval) -> Self {
        Self {
            path: path.into(),
            approval,
            keypair: OnceLock::new(),
        }
    }

    fn connected_keypair(&self) -> Result<&Keypair, WalletError> {
        self.keypair.get().ok_or(WalletError::NotConnected)
    }
}

#[async_trait]
impl Wallet for KeypairWallet {
    async fn connect(&self) -> Result<Pubkey, WalletError> {
        if let Some(keypair) = self.keypair.get() {
            return Ok(keypair.pubkey());
        }
        if !self.path.exists() {
            return Err(WalletError::NotInstalled);
        }
        let keypair = read_keypair_file(&self.path).map_err(|e| {
            WalletError::ConnectionRejected(format!(
                "cannot read keypair {}: {e}",
                self.path.display()
            ))
        })?;
        let pubkey = keypair.pubkey();
        if !(self.approval)(&pubkey) {
            return Err(WalletError::ConnectionRejected(
                "declined by user".to_string(),
            ));
        }
        // A concurrent connect may have won; either keypair is the same file.
        let _ = self.keypair.set(keypair);
        tracing::info!(%pubkey, "Wallet connected");
        Ok(pubkey)
    }

    fn is_connected(&self) -> bool {
        self.keypair.get().is_some()
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.keypair.get().map(|k| k.pubkey())
    }

    async fn sign_transaction(
        &self,
        mut tx: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError> {
        let keypair = self.connected_keypair()?;
        let signature = keypair
            .try_sign_message(&tx.message.serialize())
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        // Required signers are the first N static account keys.
        let num_required = tx.message.header().num_required_signatures as usize;
        let pubkey = keypair.pubkey();
        let pos = tx
            .message
            .static_account_keys()
            .iter()
            .take(num_required)
            .position(|k| *k == pubkey)
            .ok_or_else(|| {
                WalletError::Signing(format!("{pubkey} is not a required signer"))
            })?;
        if tx.signatures.len() < num_required {
            tx.signatures.resize(num_required, Signature::default());
        }
        tx.signatures[pos] = signature;
        Ok(tx)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        self.connected_keypair()?
            .try_sign_message(message)
            .map_err(|e| WalletError::Signing(e.to_string()))
    }
}

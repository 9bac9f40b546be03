//! Payment records as seen by the payer.
//!
//! The ledger validates links, resolves the merchant, and persists the
//! pending → completed transaction record. The server enforces the same
//! rules in SQL; [`PayClient`] reaches it over the public API.

use async_trait::async_trait;
use reqwest::StatusCode;
use solpay_sdk::client::{ClientError, PayClient};
use solpay_sdk::objects::{
    CheckoutView, CompleteTransactionRequest, TokenSymbol, TransactionResponse,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("payment link not found")]
    NotFound,
    #[error("payment link is inactive")]
    LinkInactive,
    #[error("persistence error: {0}")]
    Persistence(String),
}

#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// The active link, its merchant and the accepted tokens.
    async fn checkout_view(&self, link_id: Uuid) -> Result<CheckoutView, LedgerError>;

    /// Write a pending record for a payment in `token`.
    async fn open_pending(
        &self,
        link_id: Uuid,
        token: TokenSymbol,
    ) -> Result<TransactionResponse, LedgerError>;

    /// Record the confirmed transfer on the still-pending record.
    async fn attach_transfer(
        &self,
        link_id: Uuid,
        transaction_id: Uuid,
        transaction_signature: &str,
    ) -> Result<TransactionResponse, LedgerError>;

    /// Advance the record to completed.
    async fn complete(
        &self,
        link_id: Uuid,
        transaction_id: Uuid,
        transaction_signature: &str,
        swap_signature: Option<&str>,
    ) -> Result<TransactionResponse, LedgerError>;
}

impl From<ClientError> for LedgerError {
    fn from(err: ClientError) -> Self {
        match err.status() {
            Some(StatusCode::NOT_FOUND) => LedgerError::NotFound,
            Some(StatusCode::GONE) => LedgerError::LinkInactive,
            _ => LedgerError::Persistence(
                err.error_body()
                    .map(|body| body.message)
                    .unwrap_or_else(|| err.to_string()),
            ),
        }
    }
}

/// Errors from the transaction endpoints. The link was already resolved, so
/// a 404 there means the transaction record and not the link.
fn record_write_error(err: ClientError) -> LedgerError {
    LedgerError::Persistence(
        err.error_body()
            .map(|body| body.message)
            .unwrap_or_else(|| err.to_string()),
    )
}

#[async_trait]
impl PaymentLedger for PayClient {
    async fn checkout_view(&self, link_id: Uuid) -> Result<CheckoutView, LedgerError> {
        Ok(PayClient::checkout_view(self, link_id).await?)
    }

    async fn open_pending(
        &self,
        link_id: Uuid,
        token: TokenSymbol,
    ) -> Result<TransactionResponse, LedgerError> {
        Ok(self.open_transaction(link_id, token).await?)
    }

    async fn attach_transfer(
        &self,
        link_id: Uuid,
        transaction_id: Uuid,
        transaction_signature: &str,
    ) -> Result<TransactionResponse, LedgerError> {
        PayClient::attach_transfer(self, link_id, transaction_id, transaction_signature)
            .await
            .map_err(record_write_error)
    }

    async fn complete(
        &self,
        link_id: Uuid,
        transaction_id: Uuid,
        transaction_signature: &str,
        swap_signature: Option<&str>,
    ) -> Result<TransactionResponse, LedgerError> {
        let body = CompleteTransactionRequest {
            transaction_signature: transaction_signature.to_string(),
            swap_signature: swap_signature.map(str::to_string),
        };
        self.complete_transaction(link_id, transaction_id, &body)
            .await
            .map_err(record_write_error)
    }
}

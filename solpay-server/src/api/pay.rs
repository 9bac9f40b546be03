//! Public payment-page API.
//!
//! Called by the payer while a customer pays a link. No authentication: the
//! link id is the capability, and every write is constrained in SQL to an
//! active link and a pending transaction.
//!
//! # Endpoints
//!
//! - `GET  /tokens`                                    – accepted tokens
//! - `GET  /pay/{link_id}`                             – payment card
//! - `POST /pay/{link_id}/transactions`                – open a pending transaction
//! - `POST /pay/{link_id}/transactions/{tx_id}/transfer` – attach the confirmed transfer
//! - `POST /pay/{link_id}/transactions/{tx_id}/complete` – mark completed
//! - `GET  /pay/{link_id}/success?tx=`                 – receipt

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use kanau::processor::Processor;
use solpay_core::entities::merchants::{GetMerchantById, Merchant};
use solpay_core::entities::payment_links::{GetPaymentLinkById, PaymentLink};
use solpay_core::entities::transactions::{
    AttachTransferSignature, CompleteTransaction, GetLinkTransactionById, OpenPendingTransaction,
    Transaction, is_duplicate_signature,
};
use solpay_core::entities::TransactionStatus;
use solpay_core::framework::DatabaseProcessor;
use solpay_sdk::explorer::{explorer_tx_url, is_valid_signature};
use solpay_sdk::objects::{
    AttachTransferRequest, CheckoutView, CompleteTransactionRequest, OpenTransactionRequest,
    Network, ReceiptQuery, ReceiptView, TokenSymbol, TransactionResponse,
};
use uuid::Uuid;

use crate::api::{database_error, error_response};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tokens", get(list_tokens))
        .route("/pay/{link_id}", get(checkout_view))
        .route("/pay/{link_id}/transactions", post(open_transaction))
        .route(
            "/pay/{link_id}/transactions/{tx_id}/transfer",
            post(attach_transfer),
        )
        .route(
            "/pay/{link_id}/transactions/{tx_id}/complete",
            post(complete_transaction),
        )
        .route("/pay/{link_id}/success", get(receipt))
}

async fn list_tokens(state: State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.read().await;
    Json(catalog.tokens().to_vec())
}

/// Fetch a link and its merchant. A link whose merchant has vanished is
/// reported as not found.
async fn load_link(
    processor: &DatabaseProcessor,
    link_id: Uuid,
) -> Result<(PaymentLink, Merchant), PayApiError> {
    let link = processor
        .process(GetPaymentLinkById { id: link_id })
        .await
        .map_err(PayApiError::Database)?
        .ok_or(PayApiError::LinkNotFound)?;
    let merchant = processor
        .process(GetMerchantById {
            id: link.merchant_id,
        })
        .await
        .map_err(PayApiError::Database)?
        .ok_or(PayApiError::LinkNotFound)?;
    Ok((link, merchant))
}

/// `GET /pay/{link_id}`: the payment card for an active link.
async fn checkout_view(
    state: State<AppState>,
    Path(link_id): Path<Uuid>,
) -> Result<impl IntoResponse, PayApiError> {
    let (link, merchant) = load_link(&state.processor(), link_id).await?;
    if !link.is_active() {
        return Err(PayApiError::LinkInactive);
    }

    let tokens = state.catalog.read().await.tokens().to_vec();
    Ok(Json(CheckoutView {
        link: (&link).into(),
        merchant: (&merchant).into(),
        tokens,
    }))
}

/// `POST /pay/{link_id}/transactions`: record the customer's choice of token
/// as a pending transaction, before anything touches the chain.
async fn open_transaction(
    state: State<AppState>,
    Path(link_id): Path<Uuid>,
    Json(body): Json<OpenTransactionRequest>,
) -> Result<impl IntoResponse, PayApiError> {
    if !state.catalog.read().await.is_accepted(body.token) {
        return Err(PayApiError::UnsupportedToken(body.token));
    }

    let processor = state.processor();
    let opened = processor
        .process(OpenPendingTransaction {
            payment_link_id: link_id,
            token: body.token.into(),
        })
        .await
        .map_err(PayApiError::Database)?;

    match opened {
        Some(tx) => {
            tracing::info!(
                transaction_id = %tx.id,
                %link_id,
                token = %body.token,
                "Pending transaction opened"
            );
            Ok((StatusCode::CREATED, Json(TransactionResponse::from(&tx))))
        }
        // nothing was inserted: tell apart a missing link from an inactive one
        None => {
            let link = processor
                .process(GetPaymentLinkById { id: link_id })
                .await
                .map_err(PayApiError::Database)?;
            Err(match link {
                Some(_) => PayApiError::LinkInactive,
                None => PayApiError::LinkNotFound,
            })
        }
    }
}

/// `POST /pay/{link_id}/transactions/{tx_id}/transfer`
async fn attach_transfer(
    state: State<AppState>,
    Path((link_id, tx_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<AttachTransferRequest>,
) -> Result<impl IntoResponse, PayApiError> {
    if !is_valid_signature(&body.transaction_signature) {
        return Err(PayApiError::InvalidSignature);
    }

    let processor = state.processor();
    let attached = processor
        .process(AttachTransferSignature {
            payment_link_id: link_id,
            id: tx_id,
            transaction_signature: body.transaction_signature,
        })
        .await
        .map_err(PayApiError::from_write)?;

    match attached {
        Some(tx) => Ok(Json(TransactionResponse::from(&tx))),
        None => Err(explain_missed_update(&processor, link_id, tx_id, None).await),
    }
}

/// `POST /pay/{link_id}/transactions/{tx_id}/complete`
async fn complete_transaction(
    state: State<AppState>,
    Path((link_id, tx_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<CompleteTransactionRequest>,
) -> Result<impl IntoResponse, PayApiError> {
    let swap_ok = body
        .swap_signature
        .as_deref()
        .is_none_or(is_valid_signature);
    if !is_valid_signature(&body.transaction_signature) || !swap_ok {
        return Err(PayApiError::InvalidSignature);
    }

    let has_swap = body.swap_signature.is_some();
    let processor = state.processor();
    let completed = processor
        .process(CompleteTransaction {
            payment_link_id: link_id,
            id: tx_id,
            transaction_signature: body.transaction_signature,
            swap_signature: body.swap_signature,
        })
        .await
        .map_err(PayApiError::from_write)?;

    match completed {
        Some(tx) => {
            tracing::info!(
                transaction_id = %tx.id,
                %link_id,
                swapped = tx.swap_signature.is_some(),
                "Transaction completed"
            );
            Ok(Json(TransactionResponse::from(&tx)))
        }
        None => Err(explain_missed_update(&processor, link_id, tx_id, Some(has_swap)).await),
    }
}

/// Why a guarded update matched no row. `completion` carries whether a
/// completion request brought a swap signature.
async fn explain_missed_update(
    processor: &DatabaseProcessor,
    link_id: Uuid,
    tx_id: Uuid,
    completion: Option<bool>,
) -> PayApiError {
    match processor
        .process(GetLinkTransactionById {
            payment_link_id: link_id,
            id: tx_id,
        })
        .await
    {
        Ok(tx) => missed_update_reason(tx.as_ref(), completion),
        Err(e) => PayApiError::Database(e),
    }
}

fn missed_update_reason(tx: Option<&Transaction>, completion: Option<bool>) -> PayApiError {
    match (tx, completion) {
        (None, _) => PayApiError::TransactionNotFound,
        (Some(tx), _) if tx.status == TransactionStatus::Completed => {
            PayApiError::TransactionNotPending
        }
        (Some(tx), Some(has_swap)) if tx.needs_swap() != has_swap => PayApiError::SwapMismatch {
            needs_swap: tx.needs_swap(),
        },
        // still pending, so the transfer signature differs from the attached one
        (Some(_), _) => PayApiError::SignatureMismatch,
    }
}

/// `GET /pay/{link_id}/success?tx=`: receipt for a paid link. Inactive
/// links still have receipts.
async fn receipt(
    state: State<AppState>,
    Path(link_id): Path<Uuid>,
    Query(query): Query<ReceiptQuery>,
) -> Result<impl IntoResponse, PayApiError> {
    let (link, merchant) = load_link(&state.processor(), link_id).await?;

    let signature = query.tx.filter(|s| !s.trim().is_empty());
    if signature.as_deref().is_some_and(|s| !is_valid_signature(s)) {
        return Err(PayApiError::InvalidSignature);
    }
    let network: Network = merchant.network.into();
    let explorer_url = signature
        .as_deref()
        .map(|sig| explorer_tx_url(network, sig));

    Ok(Json(ReceiptView {
        amount: link.amount,
        merchant_name: merchant.business_name,
        link_name: link.name,
        network,
        transaction_signature: signature,
        explorer_url,
    }))
}

#[derive(Debug)]
enum PayApiError {
    Database(sqlx::Error),
    LinkNotFound,
    LinkInactive,
    UnsupportedToken(TokenSymbol),
    InvalidSignature,
    TransactionNotFound,
    TransactionNotPending,
    SignatureMismatch,
    SwapMismatch { needs_swap: bool },
    DuplicateSignature,
}

impl PayApiError {
    fn from_write(e: sqlx::Error) -> Self {
        if is_duplicate_signature(&e) {
            PayApiError::DuplicateSignature
        } else {
            PayApiError::Database(e)
        }
    }
}

impl IntoResponse for PayApiError {
    fn into_response(self) -> Response {
        match self {
            PayApiError::Database(e) => database_error("Pay", &e),
            PayApiError::LinkNotFound => {
                error_response(StatusCode::NOT_FOUND, "not_found", "payment link not found")
            }
            PayApiError::LinkInactive => error_response(
                StatusCode::GONE,
                "link_inactive",
                "this payment link is no longer active",
            ),
            PayApiError::UnsupportedToken(token) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "unsupported_token",
                format!("{token} is not accepted"),
            ),
            PayApiError::InvalidSignature => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_signature",
                "malformed transaction signature",
            ),
            PayApiError::TransactionNotFound => {
                error_response(StatusCode::NOT_FOUND, "not_found", "transaction not found")
            }
            PayApiError::TransactionNotPending => error_response(
                StatusCode::CONFLICT,
                "not_pending",
                "transaction is already completed",
            ),
            PayApiError::SignatureMismatch => error_response(
                StatusCode::CONFLICT,
                "signature_mismatch",
                "transaction signature does not match the recorded transfer",
            ),
            PayApiError::SwapMismatch { needs_swap } => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "swap_mismatch",
                if needs_swap {
                    "payment token differs from the settlement token; a swap signature is required"
                } else {
                    "payment token is the settlement token; no swap signature is expected"
                },
            ),
            PayApiError::DuplicateSignature => error_response(
                StatusCode::CONFLICT,
                "duplicate_signature",
                "transaction signature already recorded",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use solpay_core::entities::TokenSymbol as DbTokenSymbol;
    use time::macros::datetime;

    fn pending(token: DbTokenSymbol, target_token: DbTokenSymbol) -> Transaction {
        let at = datetime!(2026-03-01 12:00);
        Transaction {
            id: Uuid::new_v4(),
            merchant_id: Uuid::new_v4(),
            payment_link_id: Uuid::new_v4(),
            amount: Decimal::new(2500, 2),
            token,
            target_token,
            status: TransactionStatus::Pending,
            transaction_signature: None,
            swap_signature: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn completion_without_required_swap_is_a_swap_mismatch() {
        let tx = pending(DbTokenSymbol::Ray, DbTokenSymbol::Usdc);
        assert!(matches!(
            missed_update_reason(Some(&tx), Some(false)),
            PayApiError::SwapMismatch { needs_swap: true }
        ));
        let resp = missed_update_reason(Some(&tx), Some(false)).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn same_token_completion_with_swap_is_a_swap_mismatch() {
        let tx = pending(DbTokenSymbol::Sol, DbTokenSymbol::Sol);
        assert!(matches!(
            missed_update_reason(Some(&tx), Some(true)),
            PayApiError::SwapMismatch { needs_swap: false }
        ));
    }

    #[test]
    fn other_misses_keep_their_reasons() {
        assert!(matches!(
            missed_update_reason(None, Some(true)),
            PayApiError::TransactionNotFound
        ));

        let mut tx = pending(DbTokenSymbol::Sol, DbTokenSymbol::Sol);
        assert!(matches!(
            missed_update_reason(Some(&tx), Some(false)),
            PayApiError::SignatureMismatch
        ));
        assert!(matches!(
            missed_update_reason(Some(&tx), None),
            PayApiError::SignatureMismatch
        ));

        tx.status = TransactionStatus::Completed;
        assert!(matches!(
            missed_update_reason(Some(&tx), Some(false)),
            PayApiError::TransactionNotPending
        ));
    }
}

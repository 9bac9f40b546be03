use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use kanau::processor::Processor;
use solpay_core::entities::payment_links::{
    InsertPaymentLink, ListMerchantPaymentLinks, PaymentLink, SetPaymentLinkStatus,
};
use solpay_sdk::objects::{
    CreatePaymentLinkRequest, PaymentLinkResponse, SetPaymentLinkStatusRequest,
    payment_link::payment_page_url,
};
use url::Url;
use uuid::Uuid;

use crate::api::extractors::MerchantAuth;
use crate::state::AppState;

use super::MerchantApiError;

fn to_response(link: &PaymentLink, public_base_url: &Url) -> PaymentLinkResponse {
    PaymentLinkResponse {
        id: link.id,
        merchant_id: link.merchant_id,
        name: link.name.clone(),
        description: link.description.clone(),
        amount: link.amount,
        status: link.status.into(),
        created_at: link.created_at_unix(),
        url: payment_page_url(public_base_url, link.id),
    }
}

async fn public_base_url(state: &AppState) -> Url {
    state.config.server.read().await.public_base_url.clone()
}

/// `GET /merchant/payment-links`: newest first.
pub async fn list_payment_links(
    state: State<AppState>,
    auth: MerchantAuth,
) -> Result<impl IntoResponse, MerchantApiError> {
    let links = state
        .processor()
        .process(ListMerchantPaymentLinks {
            merchant_id: auth.merchant_id,
        })
        .await
        .map_err(MerchantApiError::Database)?;

    let base = public_base_url(&state).await;
    let response: Vec<_> = links.iter().map(|l| to_response(l, &base)).collect();
    Ok(Json(response))
}

/// `POST /merchant/payment-links`: new links are active.
pub async fn create_payment_link(
    state: State<AppState>,
    auth: MerchantAuth,
    Json(body): Json<CreatePaymentLinkRequest>,
) -> Result<impl IntoResponse, MerchantApiError> {
    body.validate()
        .map_err(|e| MerchantApiError::Validation(e.to_string()))?;

    let link = state
        .processor()
        .process(InsertPaymentLink {
            merchant_id: auth.merchant_id,
            name: body.name.trim().to_string(),
            description: body.normalized_description(),
            amount: body.amount,
        })
        .await
        .map_err(MerchantApiError::Database)?;

    tracing::info!(link_id = %link.id, merchant_id = %auth.merchant_id, amount = %link.amount, "Payment link created");
    let base = public_base_url(&state).await;
    Ok((StatusCode::CREATED, Json(to_response(&link, &base))))
}

/// `POST /merchant/payment-links/{id}/status`
pub async fn set_payment_link_status(
    state: State<AppState>,
    auth: MerchantAuth,
    Path(id): Path<Uuid>,
    Json(body): Json<SetPaymentLinkStatusRequest>,
) -> Result<impl IntoResponse, MerchantApiError> {
    let link = state
        .processor()
        .process(SetPaymentLinkStatus {
            merchant_id: auth.merchant_id,
            id,
            status: body.status.into(),
        })
        .await
        .map_err(MerchantApiError::Database)?
        .ok_or(MerchantApiError::NotFound("payment link"))?;

    let base = public_base_url(&state).await;
    Ok(Json(to_response(&link, &base)))
}

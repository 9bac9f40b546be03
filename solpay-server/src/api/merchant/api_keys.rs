use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use kanau::processor::Processor;
use solpay_core::entities::api_keys::{
    DeleteApiKey, InsertApiKey, ListMerchantApiKeys, SetApiKeyActive,
};
use solpay_sdk::auth::{generate_api_key, hash_api_key, key_hint};
use solpay_sdk::objects::{
    ApiKeyResponse, CreateApiKeyRequest, CreatedApiKey, ToggleApiKeyRequest,
};
use uuid::Uuid;

use crate::api::extractors::MerchantAuth;
use crate::state::AppState;

use super::MerchantApiError;

/// `GET /merchant/api-keys`: hints only, never the key.
pub async fn list_api_keys(
    state: State<AppState>,
    auth: MerchantAuth,
) -> Result<impl IntoResponse, MerchantApiError> {
    let keys = state
        .processor()
        .process(ListMerchantApiKeys {
            merchant_id: auth.merchant_id,
        })
        .await
        .map_err(MerchantApiError::Database)?;
    let response: Vec<ApiKeyResponse> = keys.iter().map(Into::into).collect();
    Ok(Json(response))
}

/// `POST /merchant/api-keys`: the plaintext key is in this response only.
pub async fn create_api_key(
    state: State<AppState>,
    auth: MerchantAuth,
    Json(body): Json<CreateApiKeyRequest>,
) -> Result<impl IntoResponse, MerchantApiError> {
    let key = generate_api_key();
    let created = state
        .processor()
        .process(InsertApiKey {
            merchant_id: auth.merchant_id,
            key_hash: hash_api_key(&key),
            key_hint: key_hint(&key),
            network: body.network.into(),
        })
        .await
        .map_err(MerchantApiError::Database)?;

    tracing::info!(key_id = %created.id, merchant_id = %auth.merchant_id, "API key created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedApiKey {
            id: created.id,
            key,
            network: body.network,
        }),
    ))
}

/// `POST /merchant/api-keys/{id}/toggle`
pub async fn toggle_api_key(
    state: State<AppState>,
    auth: MerchantAuth,
    Path(id): Path<Uuid>,
    Json(body): Json<ToggleApiKeyRequest>,
) -> Result<impl IntoResponse, MerchantApiError> {
    if id == auth.key_id && !body.is_active {
        return Err(MerchantApiError::CurrentKey);
    }

    let key = state
        .processor()
        .process(SetApiKeyActive {
            merchant_id: auth.merchant_id,
            id,
            is_active: body.is_active,
        })
        .await
        .map_err(MerchantApiError::Database)?
        .ok_or(MerchantApiError::NotFound("API key"))?;

    tracing::info!(key_id = %key.id, is_active = key.is_active, "API key toggled");
    Ok(Json(ApiKeyResponse::from(&key)))
}

/// `DELETE /merchant/api-keys/{id}`
pub async fn delete_api_key(
    state: State<AppState>,
    auth: MerchantAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, MerchantApiError> {
    if id == auth.key_id {
        return Err(MerchantApiError::CurrentKey);
    }

    let deleted = state
        .processor()
        .process(DeleteApiKey {
            merchant_id: auth.merchant_id,
            id,
        })
        .await
        .map_err(MerchantApiError::Database)?;

    if deleted {
        tracing::info!(key_id = %id, "API key deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MerchantApiError::NotFound("API key"))
    }
}

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use kanau::processor::Processor;
use solpay_core::entities::merchants::SignupMerchant;
use solpay_sdk::auth::{generate_api_key, hash_api_key, key_hint};
use solpay_sdk::objects::{CreateMerchantRequest, CreatedApiKey, CreatedMerchant};

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::AdminApiError;

/// `POST /merchants`: create the merchant and its first API key in one
/// database transaction. The key is returned in plaintext once.
pub async fn create_merchant(
    state: State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateMerchantRequest>,
) -> Result<impl IntoResponse, AdminApiError> {
    let settings = body.settings;
    settings
        .validate()
        .map_err(|e| AdminApiError::Validation(e.to_string()))?;
    if !state.catalog.read().await.is_accepted(settings.preferred_token) {
        return Err(AdminApiError::Validation(format!(
            "{} is not an accepted settlement token",
            settings.preferred_token
        )));
    }

    let key = generate_api_key();
    let (merchant, api_key) = state
        .processor()
        .process(SignupMerchant {
            business_name: settings.business_name.trim().to_string(),
            wallet_address: settings.wallet_address,
            preferred_token: settings.preferred_token.into(),
            network: settings.network.into(),
            key_hash: hash_api_key(&key),
            key_hint: key_hint(&key),
        })
        .await
        .map_err(AdminApiError::Database)?;

    tracing::info!(merchant_id = %merchant.id, network = %settings.network, "Merchant signed up");
    Ok((
        StatusCode::CREATED,
        Json(CreatedMerchant {
            merchant: (&merchant).into(),
            api_key: CreatedApiKey {
                id: api_key.id,
                key,
                network: api_key.network.into(),
            },
        }),
    ))
}

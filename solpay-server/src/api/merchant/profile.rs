use axum::{Json, extract::State, response::IntoResponse};
use kanau::processor::Processor;
use solpay_core::entities::merchants::{GetMerchantById, UpdateMerchantSettings};
use solpay_sdk::objects::{MerchantProfile, MerchantSettings};

use crate::api::extractors::MerchantAuth;
use crate::state::AppState;

use super::MerchantApiError;

/// `GET /merchant`
pub async fn get_profile(
    state: State<AppState>,
    auth: MerchantAuth,
) -> Result<impl IntoResponse, MerchantApiError> {
    let merchant = state
        .processor()
        .process(GetMerchantById {
            id: auth.merchant_id,
        })
        .await
        .map_err(MerchantApiError::Database)?
        .ok_or(MerchantApiError::NotFound("merchant"))?;
    Ok(Json(MerchantProfile::from(&merchant)))
}

/// `PUT /merchant`: replace business name, wallet, settlement token and
/// network.
pub async fn update_settings(
    state: State<AppState>,
    auth: MerchantAuth,
    Json(body): Json<MerchantSettings>,
) -> Result<impl IntoResponse, MerchantApiError> {
    body.validate()
        .map_err(|e| MerchantApiError::Validation(e.to_string()))?;
    if !state.catalog.read().await.is_accepted(body.preferred_token) {
        return Err(MerchantApiError::Validation(format!(
            "{} is not an accepted settlement token",
            body.preferred_token
        )));
    }

    let merchant = state
        .processor()
        .process(UpdateMerchantSettings {
            id: auth.merchant_id,
            business_name: body.business_name.trim().to_string(),
            wallet_address: body.wallet_address,
            preferred_token: body.preferred_token.into(),
            network: body.network.into(),
        })
        .await
        .map_err(MerchantApiError::Database)?
        .ok_or(MerchantApiError::NotFound("merchant"))?;

    tracing::info!(merchant_id = %merchant.id, "Merchant settings updated");
    Ok(Json(MerchantProfile::from(&merchant)))
}

//! Request authentication extractors.
//!
//! - [`MerchantAuth`]: resolves the `Solpay-Api-Key` header to an active
//!   API key and its merchant.
//! - [`AdminAuth`]: checks `Solpay-Admin-Authorization` against the argon2
//!   hash of the admin secret.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use kanau::processor::Processor;
use solpay_core::entities::api_keys::GetActiveApiKeyByHash;
use solpay_sdk::auth::{ADMIN_AUTH_HEADER, API_KEY_HEADER, hash_api_key};
use uuid::Uuid;

use crate::api::{database_error, error_response};
use crate::state::AppState;

/// The authenticated merchant of a dashboard request.
#[derive(Debug, Clone, Copy)]
pub struct MerchantAuth {
    pub merchant_id: Uuid,
    /// The key that authenticated this request.
    pub key_id: Uuid,
}

#[derive(Debug)]
pub enum MerchantAuthError {
    MissingKey,
    InvalidKey,
    Database(sqlx::Error),
}

impl IntoResponse for MerchantAuthError {
    fn into_response(self) -> Response {
        match self {
            MerchantAuthError::MissingKey => error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "missing Solpay-Api-Key header",
            ),
            MerchantAuthError::InvalidKey => {
                error_response(StatusCode::UNAUTHORIZED, "unauthorized", "invalid API key")
            }
            MerchantAuthError::Database(e) => database_error("Merchant auth", &e),
        }
    }
}

impl FromRequestParts<AppState> for MerchantAuth {
    type Rejection = MerchantAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(API_KEY_HEADER)
            .ok_or(MerchantAuthError::MissingKey)?
            .to_str()
            .map_err(|_| MerchantAuthError::InvalidKey)?
            .trim();
        if key.is_empty() {
            return Err(MerchantAuthError::MissingKey);
        }

        let api_key = state
            .processor()
            .process(GetActiveApiKeyByHash {
                key_hash: hash_api_key(key),
            })
            .await
            .map_err(MerchantAuthError::Database)?
            .ok_or(MerchantAuthError::InvalidKey)?;

        Ok(MerchantAuth {
            merchant_id: api_key.merchant_id,
            key_id: api_key.id,
        })
    }
}

/// Marker extractor for admin-only routes.
pub struct AdminAuth;

#[derive(Debug)]
pub enum AdminAuthError {
    MissingHeader,
    InvalidSecret,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AdminAuthError::MissingHeader => "missing Solpay-Admin-Authorization header",
            AdminAuthError::InvalidSecret => "invalid admin secret",
        };
        error_response(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .ok_or(AdminAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AdminAuthError::InvalidSecret)?;

        let admin = state.config.admin.read().await;
        let verified = admin.verify_secret(secret);
        drop(admin);

        if verified {
            Ok(AdminAuth)
        } else {
            tracing::warn!("Rejected admin request with invalid secret");
            Err(AdminAuthError::InvalidSecret)
        }
    }
}

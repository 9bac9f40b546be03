//! Merchant dashboard API.
//!
//! Every endpoint requires the `Solpay-Api-Key` header and acts only on the
//! merchant that owns the key.
//!
//! # Endpoints
//!
//! - `GET    /`                        – profile
//! - `PUT    /`                        – update settings
//! - `GET    /dashboard`               – lifetime summary
//! - `GET    /overview`                – daily volume, last 30 days
//! - `GET    /analytics`               – daily analytics for a range
//! - `GET    /payment-links`           – list links
//! - `POST   /payment-links`           – create a link
//! - `POST   /payment-links/{id}/status` – activate / deactivate
//! - `GET    /transactions`            – paginated history
//! - `GET    /api-keys`                – list keys
//! - `POST   /api-keys`                – generate a key
//! - `POST   /api-keys/{id}/toggle`    – enable / disable a key
//! - `DELETE /api-keys/{id}`           – delete a key

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::api::{database_error, error_response};
use crate::state::AppState;

mod api_keys;
mod dashboard;
mod payment_links;
mod profile;
mod transactions;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::get_profile).put(profile::update_settings))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/overview", get(dashboard::overview))
        .route("/analytics", get(dashboard::analytics))
        .route(
            "/payment-links",
            get(payment_links::list_payment_links).post(payment_links::create_payment_link),
        )
        .route(
            "/payment-links/{id}/status",
            post(payment_links::set_payment_link_status),
        )
        .route("/transactions", get(transactions::list_transactions))
        .route(
            "/api-keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route("/api-keys/{id}/toggle", post(api_keys::toggle_api_key))
        .route("/api-keys/{id}", axum::routing::delete(api_keys::delete_api_key))
}

#[derive(Debug)]
pub(crate) enum MerchantApiError {
    Database(sqlx::Error),
    NotFound(&'static str),
    Validation(String),
    /// The key authenticating the request cannot disable or delete itself.
    CurrentKey,
}

impl IntoResponse for MerchantApiError {
    fn into_response(self) -> Response {
        match self {
            MerchantApiError::Database(e) => database_error("Merchant", &e),
            MerchantApiError::NotFound(what) => {
                error_response(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
            }
            MerchantApiError::Validation(message) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, "validation", message)
            }
            MerchantApiError::CurrentKey => error_response(
                StatusCode::CONFLICT,
                "current_key",
                "the API key used for this request cannot be disabled or deleted",
            ),
        }
    }
}

//! HTTP API, nested under `/api/v1`.
//!
//! - public payment-page API (no auth): [`pay`]
//! - merchant dashboard API (`Solpay-Api-Key`): [`merchant`]
//! - admin API (`Solpay-Admin-Authorization`): [`admin`]

mod admin;
mod extractors;
mod merchant;
mod pay;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use solpay_sdk::objects::ErrorBody;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(pay::router())
        .nest("/merchant", merchant::router())
        .nest("/admin", admin::router())
}

/// JSON error response shared by every router.
pub(crate) fn error_response(
    status: StatusCode,
    error: &'static str,
    message: impl Into<String>,
) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

/// 500 for a failed query; the cause is only logged.
pub(crate) fn database_error(api: &'static str, e: &sqlx::Error) -> Response {
    tracing::error!(error = %e, "{api} API database error");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "internal server error",
    )
}

//! Admin API handlers.
//!
//! Require the `Solpay-Admin-Authorization` header with the plaintext admin
//! secret.
//!
//! # Endpoints
//!
//! - `POST /merchants` – sign up a merchant with its first API key

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::api::{database_error, error_response};
use crate::state::AppState;

mod create_merchant;

pub fn router() -> Router<AppState> {
    Router::new().route("/merchants", post(create_merchant::create_merchant))
}

#[derive(Debug)]
pub(crate) enum AdminApiError {
    Database(sqlx::Error),
    Validation(String),
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> Response {
        match self {
            AdminApiError::Database(e) => database_error("Admin", &e),
            AdminApiError::Validation(message) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, "validation", message)
            }
        }
    }
}

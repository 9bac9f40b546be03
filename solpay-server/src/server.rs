//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api::router())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Serve until SIGTERM/SIGINT, then drain in-flight requests.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminConfig, ServerConfig, SharedConfig, TokensConfig};
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use solpay_core::tokens::TokenCatalog;
    use solpay_sdk::auth::ADMIN_AUTH_HEADER;
    use solpay_sdk::objects::{ErrorBody, TokenInfo};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    /// A router whose pool never connects; only routes that reject before
    /// touching the database can be exercised.
    fn test_router() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://solpay@localhost/solpay")
            .unwrap();
        let salt = SaltString::generate(&mut OsRng);
        let secret_hash = Argon2::default()
            .hash_password(b"admin-secret", &salt)
            .unwrap()
            .to_string();
        let config = SharedConfig {
            server: Arc::new(RwLock::new(ServerConfig {
                listen: "127.0.0.1:0".parse().unwrap(),
                public_base_url: "https://pay.example.com".parse().unwrap(),
            })),
            admin: Arc::new(RwLock::new(AdminConfig::new(secret_hash))),
            tokens: Arc::new(RwLock::new(TokensConfig::default())),
        };
        build_router(AppState::new(
            pool,
            config,
            TokenCatalog::builtin(),
            reqwest::Client::new(),
        ))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_version() {
        let resp = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn tokens_lists_the_accepted_catalog() {
        let resp = test_router()
            .oneshot(Request::get("/api/v1/tokens").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let tokens: Vec<TokenInfo> = body_json(resp).await;
        assert_eq!(tokens.len(), 5);
    }

    #[tokio::test]
    async fn merchant_routes_require_api_key() {
        let resp = test_router()
            .oneshot(
                Request::get("/api/v1/merchant/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorBody = body_json(resp).await;
        assert_eq!(body.error, "unauthorized");
    }

    #[tokio::test]
    async fn admin_routes_reject_wrong_secret() {
        let resp = test_router()
            .oneshot(
                Request::post("/api/v1/admin/merchants")
                    .header(ADMIN_AUTH_HEADER, "not-the-secret")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_signature_is_rejected_before_persistence() {
        let link = uuid::Uuid::new_v4();
        let tx = uuid::Uuid::new_v4();
        let resp = test_router()
            .oneshot(
                Request::post(format!("/api/v1/pay/{link}/transactions/{tx}/transfer"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"transaction_signature":"nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorBody = body_json(resp).await;
        assert_eq!(body.error, "invalid_signature");
    }
}

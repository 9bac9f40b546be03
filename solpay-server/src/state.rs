//! Application state shared across all request handlers.

use crate::config::SharedConfig;
use solpay_core::framework::DatabaseProcessor;
use solpay_core::tokens::TokenCatalog;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything is behind `Arc`, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Reloaded on SIGHUP.
    pub config: SharedConfig,
    /// Accepted tokens; refreshed from `tokens.list_url` at start-up and on
    /// SIGHUP.
    pub catalog: Arc<RwLock<TokenCatalog>>,
    /// Used to fetch the token list.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        db: PgPool,
        config: SharedConfig,
        catalog: TokenCatalog,
        http: reqwest::Client,
    ) -> Self {
        Self {
            db,
            config,
            catalog: Arc::new(RwLock::new(catalog)),
            http,
        }
    }

    pub fn processor(&self) -> DatabaseProcessor {
        DatabaseProcessor {
            pool: self.db.clone(),
        }
    }

    /// Re-fetch the catalog from the configured token list. Without a list
    /// URL, or when the fetch fails, the built-in catalog is used.
    pub async fn refresh_catalog(&self) {
        let list_url = self.config.tokens.read().await.list_url.clone();
        let catalog = load_catalog(&self.http, list_url.as_ref()).await;
        *self.catalog.write().await = catalog;
    }
}

pub async fn load_catalog(http: &reqwest::Client, list_url: Option<&url::Url>) -> TokenCatalog {
    let Some(url) = list_url else {
        return TokenCatalog::builtin();
    };
    match TokenCatalog::fetch(http, url.as_str()).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(%url, error = %e, "Failed to fetch token list, using built-in catalog");
            TokenCatalog::builtin()
        }
    }
}

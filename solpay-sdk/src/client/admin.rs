//! Admin API client (operator → SolPay server).
//!
//! All requests carry the plaintext admin secret in the
//! `Solpay-Admin-Authorization` header.

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::auth::ADMIN_AUTH_HEADER;
use crate::objects::{CreateMerchantRequest, CreatedMerchant};

/// Typed HTTP client for the SolPay **Admin API**.
///
/// The secret is verified server-side against an argon2-hashed value.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    admin_secret: String,
}

impl AdminClient {
    pub fn new(base_url: Url, admin_secret: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            admin_secret: admin_secret.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api/v1/admin/merchants` – sign a merchant up and issue its
    /// first API key.
    pub async fn create_merchant(
        &self,
        body: &CreateMerchantRequest,
    ) -> Result<CreatedMerchant, ClientError> {
        let url = self.base_url.join("/api/v1/admin/merchants")?;
        let resp = self
            .http
            .post(url)
            .header(ADMIN_AUTH_HEADER, &self.admin_secret)
            .json(body)
            .send()
            .await?;
        parse_response(resp).await
    }
}

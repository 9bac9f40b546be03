//! Merchant dashboard API client.
//!
//! All requests carry a merchant API key in the `Solpay-Api-Key` header.

use reqwest::{Client, RequestBuilder};
use url::Url;
use uuid::Uuid;

use super::{ClientError, expect_success, parse_response};
use crate::auth::API_KEY_HEADER;
use crate::objects::{
    AnalyticsQuery, AnalyticsResponse, ApiKeyResponse, CreateApiKeyRequest,
    CreatePaymentLinkRequest, CreatedApiKey, ListTransactionsQuery, MerchantProfile,
    MerchantSettings, Network, PaymentLinkResponse, PaymentLinkStatus,
    SetPaymentLinkStatusRequest, ToggleApiKeyRequest, TransactionPage, TransactionSummary,
    VolumePoint,
};

/// Typed HTTP client for the SolPay **Merchant API**.
#[derive(Debug, Clone)]
pub struct MerchantClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl MerchantClient {
    /// Create a new `MerchantClient`.
    ///
    /// * `base_url` – root URL of the SolPay server.
    /// * `api_key` – an active plaintext API key of the merchant.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(API_KEY_HEADER, &self.api_key)
    }

    /// `GET /api/v1/merchant`
    pub async fn profile(&self) -> Result<MerchantProfile, ClientError> {
        let url = self.base_url.join("/api/v1/merchant")?;
        let resp = self.authed(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `PUT /api/v1/merchant` – update settings. Invalid settings answer 422.
    pub async fn update_settings(
        &self,
        settings: &MerchantSettings,
    ) -> Result<MerchantProfile, ClientError> {
        let url = self.base_url.join("/api/v1/merchant")?;
        let resp = self.authed(self.http.put(url)).json(settings).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/merchant/dashboard`
    pub async fn dashboard(&self) -> Result<TransactionSummary, ClientError> {
        let url = self.base_url.join("/api/v1/merchant/dashboard")?;
        let resp = self.authed(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/merchant/overview` – daily volume of the last 30 days.
    pub async fn overview(&self) -> Result<Vec<VolumePoint>, ClientError> {
        let url = self.base_url.join("/api/v1/merchant/overview")?;
        let resp = self.authed(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/merchant/analytics`
    pub async fn analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsResponse, ClientError> {
        let url = self.base_url.join("/api/v1/merchant/analytics")?;
        let resp = self
            .authed(self.http.get(url))
            .query(query)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/merchant/payment-links` – newest first.
    pub async fn list_payment_links(&self) -> Result<Vec<PaymentLinkResponse>, ClientError> {
        let url = self.base_url.join("/api/v1/merchant/payment-links")?;
        let resp = self.authed(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/merchant/payment-links`
    pub async fn create_payment_link(
        &self,
        body: &CreatePaymentLinkRequest,
    ) -> Result<PaymentLinkResponse, ClientError> {
        let url = self.base_url.join("/api/v1/merchant/payment-links")?;
        let resp = self.authed(self.http.post(url)).json(body).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/merchant/payment-links/{id}/status`
    pub async fn set_payment_link_status(
        &self,
        link_id: Uuid,
        status: PaymentLinkStatus,
    ) -> Result<PaymentLinkResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/merchant/payment-links/{link_id}/status"))?;
        let resp = self
            .authed(self.http.post(url))
            .json(&SetPaymentLinkStatusRequest { status })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/merchant/transactions` – one page of the history.
    pub async fn list_transactions(
        &self,
        query: &ListTransactionsQuery,
    ) -> Result<TransactionPage, ClientError> {
        let url = self.base_url.join("/api/v1/merchant/transactions")?;
        let resp = self
            .authed(self.http.get(url))
            .query(query)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/merchant/api-keys`
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKeyResponse>, ClientError> {
        let url = self.base_url.join("/api/v1/merchant/api-keys")?;
        let resp = self.authed(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/merchant/api-keys` – the plaintext key is only in this
    /// response.
    pub async fn create_api_key(&self, network: Network) -> Result<CreatedApiKey, ClientError> {
        let url = self.base_url.join("/api/v1/merchant/api-keys")?;
        let resp = self
            .authed(self.http.post(url))
            .json(&CreateApiKeyRequest { network })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/merchant/api-keys/{id}/toggle`
    pub async fn toggle_api_key(
        &self,
        key_id: Uuid,
        is_active: bool,
    ) -> Result<ApiKeyResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/merchant/api-keys/{key_id}/toggle"))?;
        let resp = self
            .authed(self.http.post(url))
            .json(&ToggleApiKeyRequest { is_active })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `DELETE /api/v1/merchant/api-keys/{id}`
    pub async fn delete_api_key(&self, key_id: Uuid) -> Result<(), ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/merchant/api-keys/{key_id}"))?;
        let resp = self.authed(self.http.delete(url)).send().await?;
        expect_success(resp).await
    }
}

//! Public payment-page API client (payer → SolPay server).
//!
//! No authentication: anyone holding a link id may load the payment card and
//! record a payment against it.

use reqwest::Client;
use url::Url;
use uuid::Uuid;

use super::{ClientError, parse_response};
use crate::objects::{
    AttachTransferRequest, CheckoutView, CompleteTransactionRequest, OpenTransactionRequest,
    ReceiptView, TokenInfo, TokenSymbol, TransactionResponse,
};

/// Typed HTTP client for the SolPay **Pay API**.
#[derive(Debug, Clone)]
pub struct PayClient {
    http: Client,
    base_url: Url,
}

impl PayClient {
    /// Create a new `PayClient` against the root URL of a SolPay server.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET /api/v1/tokens` – the accepted-token catalog.
    pub async fn tokens(&self) -> Result<Vec<TokenInfo>, ClientError> {
        let url = self.base_url.join("/api/v1/tokens")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/pay/{link_id}` – the validated payment card.
    ///
    /// Unknown links answer 404, inactive ones 410.
    pub async fn checkout_view(&self, link_id: Uuid) -> Result<CheckoutView, ClientError> {
        let url = self.base_url.join(&format!("/api/v1/pay/{link_id}"))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/pay/{link_id}/transactions` – open a pending transaction.
    pub async fn open_transaction(
        &self,
        link_id: Uuid,
        token: TokenSymbol,
    ) -> Result<TransactionResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/pay/{link_id}/transactions"))?;
        let resp = self
            .http
            .post(url)
            .json(&OpenTransactionRequest { token })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/pay/{link_id}/transactions/{tx_id}/transfer` – attach
    /// the confirmed transfer signature while the record is still pending.
    pub async fn attach_transfer(
        &self,
        link_id: Uuid,
        transaction_id: Uuid,
        transaction_signature: impl Into<String>,
    ) -> Result<TransactionResponse, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/v1/pay/{link_id}/transactions/{transaction_id}/transfer"
        ))?;
        let body = AttachTransferRequest {
            transaction_signature: transaction_signature.into(),
        };
        let resp = self.http.post(url).json(&body).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/pay/{link_id}/transactions/{tx_id}/complete`.
    pub async fn complete_transaction(
        &self,
        link_id: Uuid,
        transaction_id: Uuid,
        body: &CompleteTransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/v1/pay/{link_id}/transactions/{transaction_id}/complete"
        ))?;
        let resp = self.http.post(url).json(body).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/pay/{link_id}/success?tx=` – the receipt.
    pub async fn receipt(
        &self,
        link_id: Uuid,
        transaction_signature: Option<&str>,
    ) -> Result<ReceiptView, ClientError> {
        let mut url = self
            .base_url
            .join(&format!("/api/v1/pay/{link_id}/success"))?;
        if let Some(sig) = transaction_signature {
            url.query_pairs_mut().append_pair("tx", sig);
        }
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}

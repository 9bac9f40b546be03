//! Swap aggregator client (Jupiter v6 wire format).
//!
//! Two sequential calls: `GET {base}/quote` then `POST {base}/swap`, which
//! returns a prebuilt, ready-to-sign transaction as base64-encoded bincode.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::VersionedTransaction;
use url::Url;

pub const DEFAULT_AGGREGATOR_URL: &str = "https://quote-api.jup.ag/v6";
/// 1%.
pub const DEFAULT_SLIPPAGE_BPS: u16 = 100;

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("aggregator http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("aggregator returned status {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("invalid aggregator response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid swap transaction: {0}")]
    Transaction(String),
    #[error("invalid aggregator url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub input_mint: String,
    pub output_mint: String,
    /// Input amount in base units.
    pub amount: u64,
    pub slippage_bps: u16,
}

/// A quote as returned by the aggregator.
///
/// The raw document is kept because the swap call must echo it back
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub in_amount: String,
    pub out_amount: String,
    pub raw: serde_json::Value,
}

impl Quote {
    pub fn from_value(raw: serde_json::Value) -> Result<Self, AggregatorError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Amounts {
            in_amount: String,
            out_amount: String,
        }
        let amounts: Amounts = serde_json::from_value(raw.clone())?;
        Ok(Self {
            in_amount: amounts.in_amount,
            out_amount: amounts.out_amount,
            raw,
        })
    }
}

#[async_trait]
pub trait SwapAggregator: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, AggregatorError>;

    /// The unsigned swap transaction for `quote`, paid and signed by `user`.
    async fn swap_transaction(
        &self,
        quote: &Quote,
        user: &Pubkey,
    ) -> Result<VersionedTransaction, AggregatorError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwapRequest<'a> {
    quote_response: &'a serde_json::Value,
    user_public_key: String,
    wrap_and_unwrap_sol: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponse {
    swap_transaction: String,
}

/// Decode a base64 bincode `VersionedTransaction`.
pub fn decode_swap_transaction(encoded: &str) -> Result<VersionedTransaction, AggregatorError> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| AggregatorError::Transaction(e.to_string()))?;
    bincode::deserialize(&bytes).map_err(|e| AggregatorError::Transaction(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct JupiterClient {
    http: Client,
    base_url: Url,
}

impl JupiterClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `{base}/{endpoint}`, keeping any path prefix of the base URL.
    fn endpoint(&self, endpoint: &str) -> Result<Url, AggregatorError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{endpoint}"))?)
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, AggregatorError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AggregatorError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(AggregatorError::Json)
}

#[async_trait]
impl SwapAggregator for JupiterClient {
    #[tracing::instrument(skip_all, fields(input = %request.input_mint, output = %request.output_mint, amount = request.amount))]
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, AggregatorError> {
        let url = self.endpoint("quote")?;
        let resp = self
            .http
            .get(url)
            .query(&[
                ("inputMint", request.input_mint.clone()),
                ("outputMint", request.output_mint.clone()),
                ("amount", request.amount.to_string()),
                ("slippageBps", request.slippage_bps.to_string()),
            ])
            .send()
            .await?;
        let raw: serde_json::Value = parse_response(resp).await?;
        let quote = Quote::from_value(raw)?;
        tracing::info!(out_amount = %quote.out_amount, "Swap quoted");
        Ok(quote)
    }

    #[tracing::instrument(skip_all, fields(%user))]
    async fn swap_transaction(
        &self,
        quote: &Quote,
        user: &Pubkey,
    ) -> Result<VersionedTransaction, AggregatorError> {
        let url = self.endpoint("swap")?;
        let body = SwapRequest {
            quote_response: &quote.raw,
            user_public_key: user.to_string(),
            wrap_and_unwrap_sol: true,
        };
        let resp = self.http.post(url).json(&body).send().await?;
        let swap: SwapResponse = parse_response(resp).await?;
        decode_swap_transaction(&swap.swap_transaction)
    }
}

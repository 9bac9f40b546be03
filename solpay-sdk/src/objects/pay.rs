//! Public payment-page types (`/pay/{link_id}`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::merchant::PublicMerchant;
use super::payment_link::PublicPaymentLink;
use super::tokens::{Network, TokenInfo, TokenSymbol};

/// Everything the payment card needs: the validated link, the merchant it
/// pays, and the tokens the customer may pay with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutView {
    pub link: PublicPaymentLink,
    pub merchant: PublicMerchant,
    pub tokens: Vec<TokenInfo>,
}

/// Body of `POST /pay/{link_id}/transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTransactionRequest {
    pub token: TokenSymbol,
}

/// Body of `POST /pay/{link_id}/transactions/{tx_id}/transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachTransferRequest {
    pub transaction_signature: String,
}

/// Body of `POST /pay/{link_id}/transactions/{tx_id}/complete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteTransactionRequest {
    pub transaction_signature: String,
    #[serde(default)]
    pub swap_signature: Option<String>,
}

/// Query parameters of `GET /pay/{link_id}/success`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceiptQuery {
    #[serde(default)]
    pub tx: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptView {
    pub amount: Decimal,
    pub merchant_name: String,
    pub link_name: String,
    pub network: Network,
    pub transaction_signature: Option<String>,
    pub explorer_url: Option<String>,
}

/// Error body returned by every SolPay endpoint on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

//! Payment link types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentLinkStatus {
    Active,
    Inactive,
}

/// Payment link as listed on the merchant dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLinkResponse {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub status: PaymentLinkStatus,
    pub created_at: i64,
    /// Shareable customer-facing URL.
    pub url: String,
}

/// Body of `POST /merchant/payment-links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentLinkRequest {
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentLinkValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
}

impl CreatePaymentLinkRequest {
    pub fn validate(&self) -> Result<(), PaymentLinkValidationError> {
        if self.name.trim().is_empty() {
            return Err(PaymentLinkValidationError::EmptyName);
        }
        if self.amount <= Decimal::ZERO {
            return Err(PaymentLinkValidationError::NonPositiveAmount);
        }
        Ok(())
    }

    /// Blank descriptions are stored as absent.
    pub fn normalized_description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }
}

/// Body of `POST /merchant/payment-links/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPaymentLinkStatusRequest {
    pub status: PaymentLinkStatus,
}

/// Payment link fields shown on the public payment card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPaymentLink {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
}

/// Build the customer-facing URL `{base}/pay/{id}`.
pub fn payment_page_url(public_base_url: &Url, link_id: Uuid) -> String {
    let base = public_base_url.as_str().trim_end_matches('/');
    format!("{base}/pay/{link_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn validate_rejects_empty_name_and_zero_amount() {
        let mut req = CreatePaymentLinkRequest {
            name: "  ".to_string(),
            amount: Decimal::from_str("5.00").unwrap(),
            description: None,
        };
        assert_eq!(req.validate(), Err(PaymentLinkValidationError::EmptyName));

        req.name = "T-shirt".to_string();
        req.amount = Decimal::ZERO;
        assert_eq!(
            req.validate(),
            Err(PaymentLinkValidationError::NonPositiveAmount)
        );

        req.amount = Decimal::from_str("19.99").unwrap();
        assert_eq!(req.validate(), Ok(()));
    }

    #[test]
    fn blank_description_is_dropped() {
        let req = CreatePaymentLinkRequest {
            name: "T-shirt".to_string(),
            amount: Decimal::ONE,
            description: Some("   ".to_string()),
        };
        assert_eq!(req.normalized_description(), None);
    }

    #[test]
    fn payment_page_url_ignores_trailing_slash() {
        let id = Uuid::nil();
        let with_slash = Url::parse("https://pay.example.com/").unwrap();
        let without = Url::parse("https://pay.example.com").unwrap();
        assert_eq!(
            payment_page_url(&with_slash, id),
            format!("https://pay.example.com/pay/{id}")
        );
        assert_eq!(
            payment_page_url(&with_slash, id),
            payment_page_url(&without, id)
        );
    }
}

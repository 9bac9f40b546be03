//! Merchant profile and settings types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::api_key::CreatedApiKey;
use super::tokens::{Network, TokenSymbol};

const MIN_BUSINESS_NAME_LEN: usize = 2;

/// Merchant profile as shown on the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantProfile {
    pub id: Uuid,
    pub business_name: String,
    pub wallet_address: String,
    pub preferred_token: TokenSymbol,
    pub network: Network,
    pub created_at: i64,
}

/// Body of `PUT /merchant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantSettings {
    pub business_name: String,
    pub wallet_address: String,
    pub preferred_token: TokenSymbol,
    pub network: Network,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsValidationError {
    #[error("business name must be at least {MIN_BUSINESS_NAME_LEN} characters")]
    BusinessNameTooShort,
    #[error("invalid Solana wallet address")]
    InvalidWalletAddress,
}

impl MerchantSettings {
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        if self.business_name.trim().chars().count() < MIN_BUSINESS_NAME_LEN {
            return Err(SettingsValidationError::BusinessNameTooShort);
        }
        if !is_valid_wallet_address(&self.wallet_address) {
            return Err(SettingsValidationError::InvalidWalletAddress);
        }
        Ok(())
    }
}

/// A Solana address is the base58 encoding of a 32-byte public key.
pub fn is_valid_wallet_address(address: &str) -> bool {
    bs58::decode(address)
        .into_vec()
        .map(|bytes| bytes.len() == 32)
        .unwrap_or(false)
}

/// Body of `POST /admin/merchants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMerchantRequest {
    #[serde(flatten)]
    pub settings: MerchantSettings,
}

/// Response of `POST /admin/merchants`: the merchant and its first API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedMerchant {
    pub merchant: MerchantProfile,
    pub api_key: CreatedApiKey,
}

/// Merchant fields exposed on the public payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMerchant {
    pub id: Uuid,
    pub business_name: String,
    pub wallet_address: String,
    pub preferred_token: TokenSymbol,
    pub network: Network,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(name: &str, wallet: &str) -> MerchantSettings {
        MerchantSettings {
            business_name: name.to_string(),
            wallet_address: wallet.to_string(),
            preferred_token: TokenSymbol::Usdc,
            network: Network::Devnet,
        }
    }

    #[test]
    fn accepts_valid_settings() {
        let s = settings("Acme", "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn rejects_short_business_name() {
        let s = settings(" A ", "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        assert_eq!(
            s.validate(),
            Err(SettingsValidationError::BusinessNameTooShort)
        );
    }

    #[test]
    fn rejects_bad_wallet_address() {
        // 0, O, I and l are outside the base58 alphabet
        assert!(!is_valid_wallet_address("0OIl"));
        // valid base58, wrong length
        assert!(!is_valid_wallet_address("3mJr7AoUXx2Wqd"));
        let s = settings("Acme", "not-a-wallet");
        assert_eq!(
            s.validate(),
            Err(SettingsValidationError::InvalidWalletAddress)
        );
    }
}

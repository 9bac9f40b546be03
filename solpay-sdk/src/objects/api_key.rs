//! Merchant API key types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tokens::Network;

/// API key as listed on the settings page; the secret itself is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    pub id: Uuid,
    pub key_hint: String,
    pub network: Network,
    pub is_active: bool,
    pub created_at: i64,
}

/// Body of `POST /merchant/api-keys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateApiKeyRequest {
    pub network: Network,
}

/// A freshly generated key. This is the only time the plaintext is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedApiKey {
    pub id: Uuid,
    pub key: String,
    pub network: Network,
}

/// Body of `POST /merchant/api-keys/{id}/toggle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleApiKeyRequest {
    pub is_active: bool,
}

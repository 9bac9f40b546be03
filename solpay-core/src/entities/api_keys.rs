use crate::entities::{SolanaNetwork, unix_timestamp};
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use solpay_sdk::objects::ApiKeyResponse;
use uuid::Uuid;

/// A merchant API key. The plaintext is never stored, only its SHA-256
/// digest (`solpay_sdk::auth::hash_api_key`) and a display hint.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ApiKey {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub key_hash: String,
    pub key_hint: String,
    pub network: SolanaNetwork,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(k: &ApiKey) -> Self {
        ApiKeyResponse {
            id: k.id,
            key_hint: k.key_hint.clone(),
            network: k.network.into(),
            is_active: k.is_active,
            created_at: unix_timestamp(k.created_at),
        }
    }
}

const API_KEY_COLUMNS: &str = "id, merchant_id, key_hash, key_hint, network, is_active, created_at";

#[derive(Debug, Clone)]
/// Look up an active key by digest, for authentication.
pub struct GetActiveApiKeyByHash {
    pub key_hash: String,
}

impl Processor<GetActiveApiKeyByHash> for DatabaseProcessor {
    type Output = Option<ApiKey>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetActiveApiKeyByHash")]
    async fn process(&self, query: GetActiveApiKeyByHash) -> Result<Option<ApiKey>, sqlx::Error> {
        sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys WHERE key_hash = $1 AND is_active"
        ))
        .bind(query.key_hash)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct ListMerchantApiKeys {
    pub merchant_id: Uuid,
}

impl Processor<ListMerchantApiKeys> for DatabaseProcessor {
    type Output = Vec<ApiKey>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListMerchantApiKeys")]
    async fn process(&self, query: ListMerchantApiKeys) -> Result<Vec<ApiKey>, sqlx::Error> {
        sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys WHERE merchant_id = $1 ORDER BY created_at DESC"
        ))
        .bind(query.merchant_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct InsertApiKey {
    pub merchant_id: Uuid,
    pub key_hash: String,
    pub key_hint: String,
    pub network: SolanaNetwork,
}

impl Processor<InsertApiKey> for DatabaseProcessor {
    type Output = ApiKey;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertApiKey")]
    async fn process(&self, insert: InsertApiKey) -> Result<ApiKey, sqlx::Error> {
        sqlx::query_as::<_, ApiKey>(&format!(
            r#"
            INSERT INTO api_keys (merchant_id, key_hash, key_hint, network)
            VALUES ($1, $2, $3, $4)
            RETURNING {API_KEY_COLUMNS}
            "#
        ))
        .bind(insert.merchant_id)
        .bind(insert.key_hash)
        .bind(insert.key_hint)
        .bind(insert.network)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Enable or disable one of the merchant's keys.
pub struct SetApiKeyActive {
    pub merchant_id: Uuid,
    pub id: Uuid,
    pub is_active: bool,
}

impl Processor<SetApiKeyActive> for DatabaseProcessor {
    type Output = Option<ApiKey>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetApiKeyActive")]
    async fn process(&self, update: SetApiKeyActive) -> Result<Option<ApiKey>, sqlx::Error> {
        sqlx::query_as::<_, ApiKey>(&format!(
            r#"
            UPDATE api_keys SET is_active = $3
            WHERE id = $1 AND merchant_id = $2
            RETURNING {API_KEY_COLUMNS}
            "#
        ))
        .bind(update.id)
        .bind(update.merchant_id)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct DeleteApiKey {
    pub merchant_id: Uuid,
    pub id: Uuid,
}

impl Processor<DeleteApiKey> for DatabaseProcessor {
    /// Whether a key was deleted.
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteApiKey")]
    async fn process(&self, delete: DeleteApiKey) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND merchant_id = $2")
            .bind(delete.id)
            .bind(delete.merchant_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

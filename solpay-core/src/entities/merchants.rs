use crate::entities::api_keys::ApiKey;
use crate::entities::{SolanaNetwork, TokenSymbol, unix_timestamp};
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use solpay_sdk::objects::{MerchantProfile, PublicMerchant};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Merchant {
    pub id: Uuid,
    pub business_name: String,
    pub wallet_address: String,
    pub preferred_token: TokenSymbol,
    pub network: SolanaNetwork,
    pub created_at: time::PrimitiveDateTime,
}

impl From<&Merchant> for MerchantProfile {
    fn from(m: &Merchant) -> Self {
        MerchantProfile {
            id: m.id,
            business_name: m.business_name.clone(),
            wallet_address: m.wallet_address.clone(),
            preferred_token: m.preferred_token.into(),
            network: m.network.into(),
            created_at: unix_timestamp(m.created_at),
        }
    }
}

impl From<&Merchant> for PublicMerchant {
    fn from(m: &Merchant) -> Self {
        PublicMerchant {
            id: m.id,
            business_name: m.business_name.clone(),
            wallet_address: m.wallet_address.clone(),
            preferred_token: m.preferred_token.into(),
            network: m.network.into(),
        }
    }
}

const MERCHANT_COLUMNS: &str =
    "id, business_name, wallet_address, preferred_token, network, created_at";

#[derive(Debug, Clone)]
pub struct GetMerchantById {
    pub id: Uuid,
}

impl Processor<GetMerchantById> for DatabaseProcessor {
    type Output = Option<Merchant>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetMerchantById")]
    async fn process(&self, query: GetMerchantById) -> Result<Option<Merchant>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!(
            "SELECT {MERCHANT_COLUMNS} FROM merchants WHERE id = $1"
        ))
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Replace the editable settings of a merchant.
#[derive(Debug, Clone)]
pub struct UpdateMerchantSettings {
    pub id: Uuid,
    pub business_name: String,
    pub wallet_address: String,
    pub preferred_token: TokenSymbol,
    pub network: SolanaNetwork,
}

impl Processor<UpdateMerchantSettings> for DatabaseProcessor {
    type Output = Option<Merchant>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateMerchantSettings")]
    async fn process(&self, update: UpdateMerchantSettings) -> Result<Option<Merchant>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!(
            r#"
            UPDATE merchants
            SET business_name = $2, wallet_address = $3, preferred_token = $4, network = $5
            WHERE id = $1
            RETURNING {MERCHANT_COLUMNS}
            "#
        ))
        .bind(update.id)
        .bind(update.business_name)
        .bind(update.wallet_address)
        .bind(update.preferred_token)
        .bind(update.network)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Create a merchant together with its first API key, atomically.
pub struct SignupMerchant {
    pub business_name: String,
    pub wallet_address: String,
    pub preferred_token: TokenSymbol,
    pub network: SolanaNetwork,
    pub key_hash: String,
    pub key_hint: String,
}

impl Processor<SignupMerchant> for DatabaseProcessor {
    type Output = (Merchant, ApiKey);
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SignupMerchant")]
    async fn process(&self, signup: SignupMerchant) -> Result<(Merchant, ApiKey), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let merchant = sqlx::query_as::<_, Merchant>(&format!(
            r#"
            INSERT INTO merchants (business_name, wallet_address, preferred_token, network)
            VALUES ($1, $2, $3, $4)
            RETURNING {MERCHANT_COLUMNS}
            "#
        ))
        .bind(signup.business_name)
        .bind(signup.wallet_address)
        .bind(signup.preferred_token)
        .bind(signup.network)
        .fetch_one(&mut *tx)
        .await?;

        let key = sqlx::query_as::<_, ApiKey>(
            r#"
            INSERT INTO api_keys (merchant_id, key_hash, key_hint, network)
            VALUES ($1, $2, $3, $4)
            RETURNING id, merchant_id, key_hash, key_hint, network, is_active, created_at
            "#,
        )
        .bind(merchant.id)
        .bind(signup.key_hash)
        .bind(signup.key_hint)
        .bind(merchant.network)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((merchant, key))
    }
}

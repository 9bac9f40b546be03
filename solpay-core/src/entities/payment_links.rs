use crate::entities::{PaymentLinkStatus, unix_timestamp};
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rust_decimal::Decimal;
use solpay_sdk::objects::PublicPaymentLink;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PaymentLink {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub status: PaymentLinkStatus,
    pub created_at: time::PrimitiveDateTime,
}

impl PaymentLink {
    pub fn is_active(&self) -> bool {
        self.status == PaymentLinkStatus::Active
    }

    pub fn created_at_unix(&self) -> i64 {
        unix_timestamp(self.created_at)
    }
}

impl From<&PaymentLink> for PublicPaymentLink {
    fn from(l: &PaymentLink) -> Self {
        PublicPaymentLink {
            id: l.id,
            name: l.name.clone(),
            description: l.description.clone(),
            amount: l.amount,
        }
    }
}

const PAYMENT_LINK_COLUMNS: &str =
    "id, merchant_id, name, description, amount, status, created_at";

#[derive(Debug, Clone)]
pub struct GetPaymentLinkById {
    pub id: Uuid,
}

impl Processor<GetPaymentLinkById> for DatabaseProcessor {
    type Output = Option<PaymentLink>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPaymentLinkById")]
    async fn process(&self, query: GetPaymentLinkById) -> Result<Option<PaymentLink>, sqlx::Error> {
        sqlx::query_as::<_, PaymentLink>(&format!(
            "SELECT {PAYMENT_LINK_COLUMNS} FROM payment_links WHERE id = $1"
        ))
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// All links of a merchant, newest first.
pub struct ListMerchantPaymentLinks {
    pub merchant_id: Uuid,
}

impl Processor<ListMerchantPaymentLinks> for DatabaseProcessor {
    type Output = Vec<PaymentLink>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListMerchantPaymentLinks")]
    async fn process(
        &self,
        query: ListMerchantPaymentLinks,
    ) -> Result<Vec<PaymentLink>, sqlx::Error> {
        sqlx::query_as::<_, PaymentLink>(&format!(
            r#"
            SELECT {PAYMENT_LINK_COLUMNS} FROM payment_links
            WHERE merchant_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(query.merchant_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// New links start out active.
pub struct InsertPaymentLink {
    pub merchant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
}

impl Processor<InsertPaymentLink> for DatabaseProcessor {
    type Output = PaymentLink;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertPaymentLink")]
    async fn process(&self, insert: InsertPaymentLink) -> Result<PaymentLink, sqlx::Error> {
        sqlx::query_as::<_, PaymentLink>(&format!(
            r#"
            INSERT INTO payment_links (merchant_id, name, description, amount, status)
            VALUES ($1, $2, $3, $4, 'active')
            RETURNING {PAYMENT_LINK_COLUMNS}
            "#
        ))
        .bind(insert.merchant_id)
        .bind(insert.name)
        .bind(insert.description)
        .bind(insert.amount)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct SetPaymentLinkStatus {
    pub merchant_id: Uuid,
    pub id: Uuid,
    pub status: PaymentLinkStatus,
}

impl Processor<SetPaymentLinkStatus> for DatabaseProcessor {
    type Output = Option<PaymentLink>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetPaymentLinkStatus")]
    async fn process(
        &self,
        update: SetPaymentLinkStatus,
    ) -> Result<Option<PaymentLink>, sqlx::Error> {
        sqlx::query_as::<_, PaymentLink>(&format!(
            r#"
            UPDATE payment_links SET status = $3
            WHERE id = $1 AND merchant_id = $2
            RETURNING {PAYMENT_LINK_COLUMNS}
            "#
        ))
        .bind(update.id)
        .bind(update.merchant_id)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await
    }
}

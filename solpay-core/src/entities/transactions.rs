use crate::entities::{TokenSymbol, TransactionStatus, unix_timestamp};
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rust_decimal::Decimal;
use solpay_sdk::objects::{TransactionResponse, TransactionSortColumn};
use sqlx::{Postgres, QueryBuilder};
use time::Date;
use uuid::Uuid;

/// A payment attempt against a link.
///
/// Rows are created `pending` when the payer picks a token. The transfer
/// signature is attached once the chain confirms it, and the row moves to
/// `completed` after any swap has run.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub payment_link_id: Uuid,
    pub amount: Decimal,
    pub token: TokenSymbol,
    pub target_token: TokenSymbol,
    pub status: TransactionStatus,
    pub transaction_signature: Option<String>,
    pub swap_signature: Option<String>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

impl From<&Transaction> for TransactionResponse {
    fn from(t: &Transaction) -> Self {
        TransactionResponse {
            id: t.id,
            merchant_id: t.merchant_id,
            payment_link_id: t.payment_link_id,
            amount: t.amount,
            token: t.token.into(),
            target_token: t.target_token.into(),
            status: t.status.into(),
            transaction_signature: t.transaction_signature.clone(),
            swap_signature: t.swap_signature.clone(),
            created_at: unix_timestamp(t.created_at),
        }
    }
}

impl Transaction {
    /// Whether settlement needs a swap out of the token the customer paid in.
    pub fn needs_swap(&self) -> bool {
        self.token != self.target_token
    }
}

const TRANSACTION_COLUMNS: &str = "id, merchant_id, payment_link_id, amount, token, target_token, \
     status, transaction_signature, swap_signature, created_at, updated_at";

/// Unique index on `transactions.transaction_signature`.
pub const SIGNATURE_UNIQUE_CONSTRAINT: &str = "transactions_transaction_signature_key";

/// Whether `err` is a duplicate transfer signature.
pub fn is_duplicate_signature(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() && db.constraint() == Some(SIGNATURE_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}

fn open_pending_sql() -> String {
    format!(
        r#"
        INSERT INTO transactions (merchant_id, payment_link_id, amount, token, target_token, status)
        SELECT l.merchant_id, l.id, l.amount, $2, m.preferred_token, 'pending'
        FROM payment_links l
        JOIN merchants m ON m.id = l.merchant_id
        WHERE l.id = $1 AND l.status = 'active'
        RETURNING {TRANSACTION_COLUMNS}
        "#
    )
}

#[derive(Debug, Clone)]
/// Open a pending transaction for an active link. The amount is copied from
/// the link and the target token from the merchant's current preference.
///
/// Yields `None` when the link does not exist or is inactive.
pub struct OpenPendingTransaction {
    pub payment_link_id: Uuid,
    pub token: TokenSymbol,
}

impl Processor<OpenPendingTransaction> for DatabaseProcessor {
    type Output = Option<Transaction>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:OpenPendingTransaction")]
    async fn process(
        &self,
        open: OpenPendingTransaction,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(&open_pending_sql())
        .bind(open.payment_link_id)
        .bind(open.token)
        .fetch_optional(&self.pool)
        .await
    }
}

fn attach_transfer_sql() -> String {
    format!(
        r#"
        UPDATE transactions
        SET transaction_signature = $3, updated_at = (now() AT TIME ZONE 'utc')
        WHERE id = $1 AND payment_link_id = $2 AND status = 'pending'
        RETURNING {TRANSACTION_COLUMNS}
        "#
    )
}

#[derive(Debug, Clone)]
/// Record the confirmed transfer signature on a pending transaction.
pub struct AttachTransferSignature {
    pub payment_link_id: Uuid,
    pub id: Uuid,
    pub transaction_signature: String,
}

impl Processor<AttachTransferSignature> for DatabaseProcessor {
    type Output = Option<Transaction>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:AttachTransferSignature")]
    async fn process(
        &self,
        attach: AttachTransferSignature,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(&attach_transfer_sql())
        .bind(attach.id)
        .bind(attach.payment_link_id)
        .bind(attach.transaction_signature)
        .fetch_optional(&self.pool)
        .await
    }
}

fn complete_sql() -> String {
    format!(
        r#"
        UPDATE transactions
        SET status = 'completed',
            transaction_signature = $3,
            swap_signature = $4,
            updated_at = (now() AT TIME ZONE 'utc')
        WHERE id = $1 AND payment_link_id = $2 AND status = 'pending'
          AND (transaction_signature IS NULL OR transaction_signature = $3)
          AND ((token = target_token) = ($4::text IS NULL))
        RETURNING {TRANSACTION_COLUMNS}
        "#
    )
}

#[derive(Debug, Clone)]
/// Move a pending transaction to `completed`. The transfer signature must
/// match the one attached earlier, if any, and a swap signature is present
/// exactly when the paid token differs from the target token.
pub struct CompleteTransaction {
    pub payment_link_id: Uuid,
    pub id: Uuid,
    pub transaction_signature: String,
    pub swap_signature: Option<String>,
}

impl Processor<CompleteTransaction> for DatabaseProcessor {
    type Output = Option<Transaction>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CompleteTransaction")]
    async fn process(
        &self,
        complete: CompleteTransaction,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(&complete_sql())
        .bind(complete.id)
        .bind(complete.payment_link_id)
        .bind(complete.transaction_signature)
        .bind(complete.swap_signature)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetLinkTransactionById {
    pub payment_link_id: Uuid,
    pub id: Uuid,
}

impl Processor<GetLinkTransactionById> for DatabaseProcessor {
    type Output = Option<Transaction>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetLinkTransactionById")]
    async fn process(
        &self,
        query: GetLinkTransactionById,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 AND payment_link_id = $2"
        ))
        .bind(query.id)
        .bind(query.payment_link_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// One page of a merchant's history.
pub struct ListMerchantTransactions {
    pub merchant_id: Uuid,
    pub sort_by: TransactionSortColumn,
    pub ascending: bool,
    pub limit: i64,
    pub offset: i64,
}

fn sort_column(column: TransactionSortColumn) -> &'static str {
    match column {
        TransactionSortColumn::Id => "id",
        TransactionSortColumn::Amount => "amount",
        TransactionSortColumn::Token => "token",
        TransactionSortColumn::Status => "status",
        TransactionSortColumn::CreatedAt => "created_at",
    }
}

fn list_transactions_query(list: &ListMerchantTransactions) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
    builder.push(TRANSACTION_COLUMNS);
    builder.push(" FROM transactions WHERE merchant_id = ");
    builder.push_bind(list.merchant_id);
    builder.push(" ORDER BY ");
    builder.push(sort_column(list.sort_by));
    builder.push(if list.ascending { " ASC" } else { " DESC" });
    // stable order for equal sort keys
    builder.push(", id ASC LIMIT ");
    builder.push_bind(list.limit);
    builder.push(" OFFSET ");
    builder.push_bind(list.offset);
    builder
}

impl Processor<ListMerchantTransactions> for DatabaseProcessor {
    type Output = Vec<Transaction>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListMerchantTransactions")]
    async fn process(&self, list: ListMerchantTransactions) -> Result<Vec<Transaction>, sqlx::Error> {
        list_transactions_query(&list)
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct CountMerchantTransactions {
    pub merchant_id: Uuid,
}

impl Processor<CountMerchantTransactions> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountMerchantTransactions")]
    async fn process(&self, query: CountMerchantTransactions) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE merchant_id = $1")
            .bind(query.merchant_id)
            .fetch_one(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
/// The `limit` most recent transactions, for the dashboard.
pub struct ListRecentTransactions {
    pub merchant_id: Uuid,
    pub limit: i64,
}

impl Processor<ListRecentTransactions> for DatabaseProcessor {
    type Output = Vec<Transaction>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListRecentTransactions")]
    async fn process(&self, query: ListRecentTransactions) -> Result<Vec<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS} FROM transactions
            WHERE merchant_id = $1
            ORDER BY created_at DESC, id ASC
            LIMIT $2
            "#
        ))
        .bind(query.merchant_id)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MerchantTotals {
    pub total_transactions: i64,
    pub successful_transactions: i64,
    pub total_volume: Decimal,
}

#[derive(Debug, Clone)]
/// Lifetime totals over every transaction of a merchant.
pub struct GetMerchantTotals {
    pub merchant_id: Uuid,
}

impl Processor<GetMerchantTotals> for DatabaseProcessor {
    type Output = MerchantTotals;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetMerchantTotals")]
    async fn process(&self, query: GetMerchantTotals) -> Result<MerchantTotals, sqlx::Error> {
        sqlx::query_as::<_, MerchantTotals>(
            r#"
            SELECT
                COUNT(*) AS total_transactions,
                COUNT(*) FILTER (WHERE status = 'completed') AS successful_transactions,
                COALESCE(SUM(amount), 0) AS total_volume
            FROM transactions
            WHERE merchant_id = $1
            "#,
        )
        .bind(query.merchant_id)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyVolume {
    pub date: Date,
    pub total: Decimal,
}

#[derive(Debug, Clone)]
/// Per-day sum of amounts from `since` onward. Days without transactions
/// are absent.
pub struct GetDailyVolume {
    pub merchant_id: Uuid,
    pub since: Date,
}

impl Processor<GetDailyVolume> for DatabaseProcessor {
    type Output = Vec<DailyVolume>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetDailyVolume")]
    async fn process(&self, query: GetDailyVolume) -> Result<Vec<DailyVolume>, sqlx::Error> {
        sqlx::query_as::<_, DailyVolume>(
            r#"
            SELECT created_at::date AS date, SUM(amount) AS total
            FROM transactions
            WHERE merchant_id = $1 AND created_at::date >= $2
            GROUP BY created_at::date
            ORDER BY date ASC
            "#,
        )
        .bind(query.merchant_id)
        .bind(query.since)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_query_whitelists_sort_column() {
        let list = ListMerchantTransactions {
            merchant_id: Uuid::nil(),
            sort_by: TransactionSortColumn::Amount,
            ascending: true,
            limit: 10,
            offset: 20,
        };
        let builder = list_transactions_query(&list);
        let sql = builder.sql();
        assert!(sql.contains("WHERE merchant_id = $1"));
        assert!(sql.contains("ORDER BY amount ASC, id ASC LIMIT $2 OFFSET $3"));

        let list = ListMerchantTransactions {
            sort_by: TransactionSortColumn::CreatedAt,
            ascending: false,
            ..list
        };
        let builder = list_transactions_query(&list);
        let sql = builder.sql();
        assert!(sql.contains("ORDER BY created_at DESC"));
    }

    #[test]
    fn open_pending_only_selects_active_links() {
        let sql = open_pending_sql();
        assert!(sql.contains("INSERT INTO transactions"));
        assert!(sql.contains("WHERE l.id = $1 AND l.status = 'active'"));
        assert!(sql.contains("m.preferred_token, 'pending'"));
    }

    #[test]
    fn writes_only_match_pending_rows() {
        for sql in [attach_transfer_sql(), complete_sql()] {
            assert!(sql.contains("AND status = 'pending'"));
        }
        let complete = complete_sql();
        assert!(complete.contains("(transaction_signature IS NULL OR transaction_signature = $3)"));
        assert!(complete.contains("((token = target_token) = ($4::text IS NULL))"));
    }

    /// Against a real database; run with `DATABASE_URL` set and `--ignored`.
    mod postgres {
        use super::super::*;
        use crate::entities::PaymentLinkStatus;
        use sqlx::PgPool;

        async fn seed_link(
            pool: &PgPool,
            preferred: TokenSymbol,
            status: PaymentLinkStatus,
        ) -> sqlx::Result<Uuid> {
            let merchant_id: Uuid = sqlx::query_scalar(
                "INSERT INTO merchants (business_name, wallet_address, preferred_token) \
                 VALUES ('Coffee', '11111111111111111111111111111111', $1) RETURNING id",
            )
            .bind(preferred)
            .fetch_one(pool)
            .await?;
            sqlx::query_scalar(
                "INSERT INTO payment_links (merchant_id, name, amount, status) \
                 VALUES ($1, 'Latte', 10, $2) RETURNING id",
            )
            .bind(merchant_id)
            .bind(status)
            .fetch_one(pool)
            .await
        }

        async fn count(pool: &PgPool) -> sqlx::Result<i64> {
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
                .fetch_one(pool)
                .await
        }

        #[sqlx::test(migrations = "../migrations")]
        #[ignore = "needs a PostgreSQL DATABASE_URL"]
        async fn inactive_link_inserts_nothing(pool: PgPool) -> sqlx::Result<()> {
            let processor = DatabaseProcessor::new(pool.clone());
            let link = seed_link(&pool, TokenSymbol::Sol, PaymentLinkStatus::Inactive).await?;

            let opened = processor
                .process(OpenPendingTransaction {
                    payment_link_id: link,
                    token: TokenSymbol::Sol,
                })
                .await?;
            assert!(opened.is_none());
            assert_eq!(count(&pool).await?, 0);
            Ok(())
        }

        #[sqlx::test(migrations = "../migrations")]
        #[ignore = "needs a PostgreSQL DATABASE_URL"]
        async fn completed_row_is_never_updated_again(pool: PgPool) -> sqlx::Result<()> {
            let processor = DatabaseProcessor::new(pool.clone());
            let link = seed_link(&pool, TokenSymbol::Sol, PaymentLinkStatus::Active).await?;
            let tx = processor
                .process(OpenPendingTransaction {
                    payment_link_id: link,
                    token: TokenSymbol::Sol,
                })
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            assert_eq!(tx.status, TransactionStatus::Pending);
            assert_eq!(tx.target_token, TokenSymbol::Sol);

            let complete = CompleteTransaction {
                payment_link_id: link,
                id: tx.id,
                transaction_signature: "transfer-sig".to_string(),
                swap_signature: None,
            };
            let done = processor
                .process(complete.clone())
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            assert_eq!(done.status, TransactionStatus::Completed);

            assert!(processor.process(complete).await?.is_none());
            let attached = processor
                .process(AttachTransferSignature {
                    payment_link_id: link,
                    id: tx.id,
                    transaction_signature: "other-sig".to_string(),
                })
                .await?;
            assert!(attached.is_none());
            Ok(())
        }

        #[sqlx::test(migrations = "../migrations")]
        #[ignore = "needs a PostgreSQL DATABASE_URL"]
        async fn swap_signature_must_match_token_pair(pool: PgPool) -> sqlx::Result<()> {
            let processor = DatabaseProcessor::new(pool.clone());
            let link = seed_link(&pool, TokenSymbol::Usdc, PaymentLinkStatus::Active).await?;
            let tx = processor
                .process(OpenPendingTransaction {
                    payment_link_id: link,
                    token: TokenSymbol::Ray,
                })
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            assert!(tx.needs_swap());

            let without_swap = processor
                .process(CompleteTransaction {
                    payment_link_id: link,
                    id: tx.id,
                    transaction_signature: "transfer-sig".to_string(),
                    swap_signature: None,
                })
                .await?;
            assert!(without_swap.is_none());

            let with_swap = processor
                .process(CompleteTransaction {
                    payment_link_id: link,
                    id: tx.id,
                    transaction_signature: "transfer-sig".to_string(),
                    swap_signature: Some("swap-sig".to_string()),
                })
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            assert_eq!(with_swap.status, TransactionStatus::Completed);
            assert_eq!(with_swap.target_token, TokenSymbol::Usdc);
            Ok(())
        }
    }
}

use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rust_decimal::Decimal;
use solpay_sdk::objects::DailyAnalytics;
use time::Date;
use uuid::Uuid;

/// Row of the `transaction_analytics` view.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyAnalyticsRow {
    pub date: Date,
    pub total_transactions: i64,
    pub successful_transactions: i64,
    pub total_volume: Decimal,
}

impl From<DailyAnalyticsRow> for DailyAnalytics {
    fn from(row: DailyAnalyticsRow) -> Self {
        DailyAnalytics {
            date: row.date,
            total_transactions: row.total_transactions,
            successful_transactions: row.successful_transactions,
            total_volume: row.total_volume,
        }
    }
}

#[derive(Debug, Clone)]
/// Days in `[from, to]` that have at least one transaction, oldest first.
pub struct GetDailyAnalytics {
    pub merchant_id: Uuid,
    pub from: Date,
    pub to: Date,
}

impl Processor<GetDailyAnalytics> for DatabaseProcessor {
    type Output = Vec<DailyAnalyticsRow>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetDailyAnalytics")]
    async fn process(&self, query: GetDailyAnalytics) -> Result<Vec<DailyAnalyticsRow>, sqlx::Error> {
        sqlx::query_as::<_, DailyAnalyticsRow>(
            r#"
            SELECT date, total_transactions, successful_transactions, total_volume
            FROM transaction_analytics
            WHERE merchant_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC
            "#,
        )
        .bind(query.merchant_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(&self.pool)
        .await
    }
}

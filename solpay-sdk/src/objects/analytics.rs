//! Dashboard and analytics response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

/// One row of the per-day analytics view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAnalytics {
    pub date: Date,
    pub total_transactions: i64,
    pub successful_transactions: i64,
    pub total_volume: Decimal,
}

/// Totals over a set of transactions.
///
/// `success_rate` is a percentage; both ratios are zero for an empty set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_transactions: i64,
    pub successful_transactions: i64,
    pub total_volume: Decimal,
    pub average_transaction: Decimal,
    pub success_rate: Decimal,
}

/// Query parameters of `GET /merchant/analytics`. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub from: Option<Date>,
    #[serde(default)]
    pub to: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub from: Date,
    pub to: Date,
    pub days: Vec<DailyAnalytics>,
    pub summary: TransactionSummary,
}

/// A bar of the 30-day overview chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub date: Date,
    pub total: Decimal,
}

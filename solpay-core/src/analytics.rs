//! Dashboard aggregation.

use rust_decimal::Decimal;
use solpay_sdk::objects::{DailyAnalytics, TransactionSummary};
use time::{Date, Duration};

/// Length of the overview chart and of the default analytics range.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Totals with derived ratios. Empty input yields zeros.
pub fn summarize(
    total_transactions: i64,
    successful_transactions: i64,
    total_volume: Decimal,
) -> TransactionSummary {
    if total_transactions <= 0 {
        return TransactionSummary {
            total_volume,
            ..Default::default()
        };
    }
    let count = Decimal::from(total_transactions);
    TransactionSummary {
        total_transactions,
        successful_transactions,
        total_volume,
        average_transaction: (total_volume / count).round_dp(2),
        success_rate: (Decimal::from(successful_transactions) * Decimal::ONE_HUNDRED / count)
            .round_dp(2),
    }
}

/// Summary over the rows of the per-day analytics view.
pub fn summarize_days(days: &[DailyAnalytics]) -> TransactionSummary {
    let (total, successful, volume) = days.iter().fold(
        (0i64, 0i64, Decimal::ZERO),
        |(total, successful, volume), day| {
            (
                total + day.total_transactions,
                successful + day.successful_transactions,
                volume + day.total_volume,
            )
        },
    );
    summarize(total, successful, volume)
}

/// Inclusive `(from, to)` range, defaulting to the last 30 days up to
/// `today`. Bounds given in the wrong order are swapped.
pub fn resolve_range(from: Option<Date>, to: Option<Date>, today: Date) -> (Date, Date) {
    let to = to.unwrap_or(today);
    let from = from.unwrap_or_else(|| last_days_start(to));
    if from > to { (to, from) } else { (from, to) }
}

/// First day of the `DEFAULT_RANGE_DAYS`-day window ending on `end`.
pub fn last_days_start(end: Date) -> Date {
    end.checked_sub(Duration::days(DEFAULT_RANGE_DAYS - 1))
        .unwrap_or(Date::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use time::macros::date;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn empty_summary_has_no_nan() {
        let s = summarize(0, 0, Decimal::ZERO);
        assert_eq!(s.average_transaction, Decimal::ZERO);
        assert_eq!(s.success_rate, Decimal::ZERO);
        assert_eq!(summarize_days(&[]), TransactionSummary::default());
    }

    #[test]
    fn summary_ratios() {
        let s = summarize(3, 2, d("35.50"));
        assert_eq!(s.average_transaction, d("11.83"));
        assert_eq!(s.success_rate, d("66.67"));
    }

    #[test]
    fn days_are_folded() {
        let days = vec![
            DailyAnalytics {
                date: date!(2024 - 03 - 01),
                total_transactions: 2,
                successful_transactions: 1,
                total_volume: d("10"),
            },
            DailyAnalytics {
                date: date!(2024 - 03 - 02),
                total_transactions: 2,
                successful_transactions: 2,
                total_volume: d("30"),
            },
        ];
        let s = summarize_days(&days);
        assert_eq!(s.total_transactions, 4);
        assert_eq!(s.successful_transactions, 3);
        assert_eq!(s.total_volume, d("40"));
        assert_eq!(s.average_transaction, d("10"));
        assert_eq!(s.success_rate, d("75"));
    }

    #[test]
    fn default_range_is_thirty_days_inclusive() {
        let today = date!(2024 - 03 - 30);
        assert_eq!(
            resolve_range(None, None, today),
            (date!(2024 - 03 - 01), today)
        );
        assert_eq!(
            resolve_range(Some(date!(2024 - 03 - 10)), Some(date!(2024 - 03 - 05)), today),
            (date!(2024 - 03 - 05), date!(2024 - 03 - 10))
        );
    }
}

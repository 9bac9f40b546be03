use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use solpay_core::analytics::{last_days_start, resolve_range, summarize, summarize_days};
use solpay_core::entities::transaction_analytics::GetDailyAnalytics;
use solpay_core::entities::transactions::{GetDailyVolume, GetMerchantTotals};
use solpay_sdk::objects::{AnalyticsQuery, AnalyticsResponse, DailyAnalytics, VolumePoint};
use time::OffsetDateTime;

use crate::api::extractors::MerchantAuth;
use crate::state::AppState;

use super::MerchantApiError;

/// `GET /merchant/dashboard`: totals over every transaction.
pub async fn dashboard(
    state: State<AppState>,
    auth: MerchantAuth,
) -> Result<impl IntoResponse, MerchantApiError> {
    let totals = state
        .processor()
        .process(GetMerchantTotals {
            merchant_id: auth.merchant_id,
        })
        .await
        .map_err(MerchantApiError::Database)?;

    Ok(Json(summarize(
        totals.total_transactions,
        totals.successful_transactions,
        totals.total_volume,
    )))
}

/// `GET /merchant/overview`: amounts per UTC day over the last 30 days.
pub async fn overview(
    state: State<AppState>,
    auth: MerchantAuth,
) -> Result<impl IntoResponse, MerchantApiError> {
    let today = OffsetDateTime::now_utc().date();
    let days = state
        .processor()
        .process(GetDailyVolume {
            merchant_id: auth.merchant_id,
            since: last_days_start(today),
        })
        .await
        .map_err(MerchantApiError::Database)?;

    let points: Vec<VolumePoint> = days
        .into_iter()
        .map(|d| VolumePoint {
            date: d.date,
            total: d.total,
        })
        .collect();
    Ok(Json(points))
}

/// `GET /merchant/analytics?from&to`
pub async fn analytics(
    state: State<AppState>,
    auth: MerchantAuth,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, MerchantApiError> {
    let today = OffsetDateTime::now_utc().date();
    let (from, to) = resolve_range(query.from, query.to, today);

    let rows = state
        .processor()
        .process(GetDailyAnalytics {
            merchant_id: auth.merchant_id,
            from,
            to,
        })
        .await
        .map_err(MerchantApiError::Database)?;

    let days: Vec<DailyAnalytics> = rows.into_iter().map(Into::into).collect();
    let summary = summarize_days(&days);
    Ok(Json(AnalyticsResponse {
        from,
        to,
        days,
        summary,
    }))
}

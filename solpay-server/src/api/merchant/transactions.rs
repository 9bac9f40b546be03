use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use solpay_core::entities::transactions::{CountMerchantTransactions, ListMerchantTransactions};
use solpay_sdk::objects::transaction::total_pages;
use solpay_sdk::objects::{ListTransactionsQuery, TRANSACTION_PAGE_SIZE, TransactionPage};

use crate::api::extractors::MerchantAuth;
use crate::state::AppState;

use super::MerchantApiError;

/// `GET /merchant/transactions?page&sort_by&ascending`
pub async fn list_transactions(
    state: State<AppState>,
    auth: MerchantAuth,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<impl IntoResponse, MerchantApiError> {
    let processor = state.processor();
    let (limit, offset) = query.limit_offset();

    let rows = processor
        .process(ListMerchantTransactions {
            merchant_id: auth.merchant_id,
            sort_by: query.sort_by,
            ascending: query.ascending,
            limit,
            offset,
        })
        .await
        .map_err(MerchantApiError::Database)?;
    let total_count = processor
        .process(CountMerchantTransactions {
            merchant_id: auth.merchant_id,
        })
        .await
        .map_err(MerchantApiError::Database)?;

    Ok(Json(TransactionPage {
        transactions: rows.iter().map(Into::into).collect(),
        page: query.page.max(1),
        page_size: TRANSACTION_PAGE_SIZE,
        total_count,
        total_pages: total_pages(total_count, TRANSACTION_PAGE_SIZE),
    }))
}

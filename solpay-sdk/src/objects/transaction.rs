//! Transaction record types and the paginated history query.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tokens::TokenSymbol;

/// Rows per page of the transaction history.
pub const TRANSACTION_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub payment_link_id: Uuid,
    pub amount: Decimal,
    pub token: TokenSymbol,
    pub target_token: TokenSymbol,
    pub status: TransactionStatus,
    pub transaction_signature: Option<String>,
    pub swap_signature: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSortColumn {
    Id,
    Amount,
    Token,
    Status,
    #[default]
    CreatedAt,
}

/// Query parameters of `GET /merchant/transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTransactionsQuery {
    /// 1-based page number.
    #[serde(default = "first_page")]
    pub page: i64,
    #[serde(default)]
    pub sort_by: TransactionSortColumn,
    #[serde(default)]
    pub ascending: bool,
}

impl Default for ListTransactionsQuery {
    fn default() -> Self {
        Self {
            page: first_page(),
            sort_by: TransactionSortColumn::default(),
            ascending: false,
        }
    }
}

fn first_page() -> i64 {
    1
}

impl ListTransactionsQuery {
    /// `(limit, offset)` for the requested page; pages below 1 read as 1.
    /// Pages past the addressable range saturate and read as empty.
    pub fn limit_offset(&self) -> (i64, i64) {
        let page = self.page.max(1);
        (
            TRANSACTION_PAGE_SIZE,
            (page - 1).saturating_mul(TRANSACTION_PAGE_SIZE),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionResponse>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// `ceil(count / page_size)`.
pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 || page_size <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}

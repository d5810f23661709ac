use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DateRange, TransactionStats};
use crate::models::Transaction;

/// Query parameters shared by the transaction list and stats endpoints.
/// `filter` takes daily/weekly/monthly/custom, or "all" to skip date
/// scoping entirely.
#[derive(Debug, Deserialize)]
pub struct DateFilterQuery {
    pub filter: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// Not nested/flattened: query-string deserialization cannot handle
// serde(flatten) alongside numeric fields.
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub filter: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListSummary {
    pub total_transactions: usize,
    pub total_amount: Decimal,
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub summary: ListSummary,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub statistics: TransactionStats,
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Serialize)]
pub struct RecentTransactionsResponse {
    pub transactions: Vec<Transaction>,
}

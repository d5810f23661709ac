use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use service_core::error::AppError;

use crate::domain::{date_range, summarize, DateRange, FilterType};
use crate::dtos::{
    DateFilterQuery, ListSummary, Pagination, RecentQuery, RecentTransactionsResponse,
    StatsResponse, TransactionListQuery, TransactionListResponse,
};
use crate::middleware::AuthUser;
use crate::startup::AppState;

const DEFAULT_PAGE_SIZE: usize = 50;

/// Resolve a filter keyword to a date window. "all" means no window at all,
/// bypassing the resolver entirely.
fn resolve_range(
    filter: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
    default_filter: &str,
) -> Result<(String, Option<DateRange>), AppError> {
    let filter = filter.unwrap_or(default_filter).to_string();

    if filter == "all" {
        return Ok((filter, None));
    }

    let filter_type: FilterType = filter.parse().map_err(AppError::from)?;
    let range =
        date_range::resolve(filter_type, start_date, end_date).map_err(AppError::from)?;

    Ok((filter, Some(range)))
}

/// GET /api/dashboard/transactions: date-scoped list with totals and
/// in-memory pagination.
pub async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TransactionListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (filter, range) = resolve_range(
        query.filter.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        "daily",
    )?;

    let transactions = state
        .db
        .fetch_transactions(auth.user_id, range.as_ref())
        .await?;

    let total_items = transactions.len();
    let total_amount: Decimal = transactions
        .iter()
        .filter_map(|t| t.amount)
        .sum();

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let total_pages = total_items.div_ceil(limit);

    let page_items: Vec<_> = transactions
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Ok(Json(TransactionListResponse {
        transactions: page_items,
        summary: ListSummary {
            total_transactions: total_items,
            total_amount,
            filter,
            date_range: range,
        },
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
        },
    }))
}

/// GET /api/dashboard/stats: aggregate totals and per-bank breakdown.
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (filter, range) = resolve_range(
        query.filter.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        "monthly",
    )?;

    let transactions = state
        .db
        .fetch_transactions(auth.user_id, range.as_ref())
        .await?;

    Ok(Json(StatsResponse {
        statistics: summarize(&transactions),
        filter,
        date_range: range,
    }))
}

/// GET /api/dashboard/recent: the newest N transactions, no date scoping.
pub async fn recent(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(10).max(1);

    let mut transactions = state.db.fetch_transactions(auth.user_id, None).await?;
    transactions.truncate(limit);

    Ok(Json(RecentTransactionsResponse { transactions }))
}

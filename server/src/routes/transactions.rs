//! Transaction routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use farmdesk_engine::entities::{Transaction, TransactionFilter, TransactionSummary};
use serde::Deserialize;

use super::records::{create_one, delete_one, get_one, update_one};
use crate::error::Result;
use crate::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct MonthParams {
    pub year: i32,
    pub month: u32,
}

type QueryResult<T> = std::result::Result<Query<T>, QueryRejection>;

/// Create transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/transactions",
            get(list_transactions).post(create_one::<Transaction>),
        )
        .route("/api/transactions/recent", get(recent))
        .route("/api/transactions/month", get(by_month))
        .route("/api/transactions/summary", get(summary))
        .route(
            "/api/transactions/{id}",
            get(get_one::<Transaction>)
                .patch(update_one::<Transaction>)
                .delete(delete_one::<Transaction>),
        )
}

/// GET /api/transactions?type=&category=&farmId=&dateFrom=&dateTo=&search=
async fn list_transactions(
    State(state): State<AppState>,
    filter: QueryResult<TransactionFilter>,
) -> Result<ApiResponse<Vec<Transaction>>> {
    let Query(filter) = filter?;
    let transactions = &state.book.transactions;
    let envelope = if filter == TransactionFilter::default() {
        transactions.list().await
    } else {
        transactions.find(&filter.to_query()).await
    };
    Ok(envelope.into())
}

/// GET /api/transactions/recent?limit=
async fn recent(
    State(state): State<AppState>,
    params: QueryResult<RecentParams>,
) -> Result<ApiResponse<Vec<Transaction>>> {
    let Query(params) = params?;
    Ok(state.book.recent_transactions(params.limit).await.into())
}

/// GET /api/transactions/month?year=&month=
async fn by_month(
    State(state): State<AppState>,
    params: QueryResult<MonthParams>,
) -> Result<ApiResponse<Vec<Transaction>>> {
    let Query(params) = params?;
    Ok(state
        .book
        .transactions_by_month(params.year, params.month)
        .await
        .into())
}

/// GET /api/transactions/summary - Totals over the filtered transactions.
async fn summary(
    State(state): State<AppState>,
    filter: QueryResult<TransactionFilter>,
) -> Result<ApiResponse<TransactionSummary>> {
    let Query(filter) = filter?;
    Ok(state.book.transaction_summary(&filter).await.into())
}

//! Dashboard endpoint.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::response::ApiResponse;
use crate::services::DashboardStats;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    /// Day the stats are computed for, today when absent
    pub date: Option<NaiveDate>,
}

/// Create dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(dashboard))
}

/// GET /api/dashboard?date=
async fn dashboard(
    State(state): State<AppState>,
    params: std::result::Result<Query<DashboardParams>, QueryRejection>,
) -> Result<ApiResponse<DashboardStats>> {
    let Query(params) = params?;
    let today = params.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(state.book.dashboard(today).await.into())
}

//! Farm routes.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use farmdesk_engine::entities::{Crop, Farm, Task, Transaction};
use serde::Deserialize;

use super::records::{create_one, get_one, owned_by, path_id, update_one};
use crate::error::Result;
use crate::response::ApiResponse;
use crate::services::FarmOverview;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FarmListParams {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub cascade: bool,
}

/// Create farm routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/farms", get(list_farms).post(create_one::<Farm>))
        .route(
            "/api/farms/{id}",
            get(get_one::<Farm>)
                .patch(update_one::<Farm>)
                .delete(delete_farm),
        )
        .route("/api/farms/{id}/overview", get(overview))
        .route("/api/farms/{id}/crops", get(owned_by::<Crop>))
        .route("/api/farms/{id}/tasks", get(owned_by::<Task>))
        .route("/api/farms/{id}/transactions", get(owned_by::<Transaction>))
}

/// GET /api/farms?search= - All farms, optionally searched by name and location.
async fn list_farms(
    State(state): State<AppState>,
    params: std::result::Result<Query<FarmListParams>, QueryRejection>,
) -> Result<ApiResponse<Vec<Farm>>> {
    let Query(params) = params?;
    let farms = &state.book.farms;
    let envelope = match params.search {
        Some(term) => farms.find(&Farm::search(&term)).await,
        None => farms.list().await,
    };
    Ok(envelope.into())
}

/// DELETE /api/farms/{id}?cascade=true
async fn delete_farm(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    params: std::result::Result<Query<DeleteParams>, QueryRejection>,
) -> Result<Response> {
    let id = path_id(&raw)?;
    let Query(params) = params?;
    let response = if params.cascade {
        ApiResponse::new(state.book.delete_farm_cascade(id).await).into_response()
    } else {
        ApiResponse::new(state.book.farms.delete(id).await).into_response()
    };
    Ok(response)
}

/// GET /api/farms/{id}/overview
async fn overview(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<ApiResponse<FarmOverview>> {
    let id = path_id(&raw)?;
    Ok(state.book.farm_overview(id).await.into())
}

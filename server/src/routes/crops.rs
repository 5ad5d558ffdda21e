//! Crop routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use farmdesk_engine::entities::{Crop, CropStatus};
use serde::Deserialize;

use super::records::{create_one, delete_one, get_one, update_one};
use crate::error::Result;
use crate::response::ApiResponse;
use crate::AppState;

/// Query parameters for the crop list.
#[derive(Debug, Default, Deserialize)]
pub struct CropListParams {
    pub search: Option<String>,
    pub status: Option<CropStatus>,
}

/// Create crop routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/crops", get(list_crops).post(create_one::<Crop>))
        .route(
            "/api/crops/{id}",
            get(get_one::<Crop>)
                .patch(update_one::<Crop>)
                .delete(delete_one::<Crop>),
        )
}

/// GET /api/crops?search=&status=
async fn list_crops(
    State(state): State<AppState>,
    params: std::result::Result<Query<CropListParams>, QueryRejection>,
) -> Result<ApiResponse<Vec<Crop>>> {
    let Query(params) = params?;
    let crops = &state.book.crops;
    let envelope = match (params.search.as_deref(), params.status) {
        (None, None) => crops.list().await,
        (term, status) => crops.find(&Crop::search(term.unwrap_or(""), status)).await,
    };
    Ok(envelope.into())
}

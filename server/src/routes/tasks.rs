//! Task routes.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use farmdesk_engine::entities::Task;

use super::records::{create_one, delete_one, get_one, list_all, path_id, update_one};
use crate::error::Result;
use crate::response::ApiResponse;
use crate::AppState;

/// Create task routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_all::<Task>).post(create_one::<Task>))
        .route(
            "/api/tasks/{id}",
            get(get_one::<Task>)
                .patch(update_one::<Task>)
                .delete(delete_one::<Task>),
        )
        .route("/api/tasks/{id}/toggle", post(toggle))
}

/// POST /api/tasks/{id}/toggle - Flip between pending and completed.
async fn toggle(State(state): State<AppState>, Path(raw): Path<String>) -> Result<ApiResponse<Task>> {
    let id = path_id(&raw)?;
    Ok(state.book.toggle_task(id).await.into())
}

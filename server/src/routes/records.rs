//! Handlers shared by every entity collection.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use farmdesk_engine::Error;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::response::ApiResponse;
use crate::services::Stored;
use crate::AppState;

/// Parse an `{id}` path segment. Range checks happen in the store.
pub(crate) fn path_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Engine(Error::InvalidId(raw.to_string())))
}

/// GET /api/{collection}
pub(crate) async fn list_all<T: Stored>(State(state): State<AppState>) -> ApiResponse<Vec<T>> {
    T::store(&state.book).list().await.into()
}

/// POST /api/{collection}
pub(crate) async fn create_one<T: Stored>(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<T>> {
    let Json(payload) = payload?;
    Ok(ApiResponse::created(
        T::store(&state.book).create(payload).await,
    ))
}

/// GET /api/{collection}/{id}
pub(crate) async fn get_one<T: Stored>(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<ApiResponse<T>> {
    let id = path_id(&raw)?;
    Ok(T::store(&state.book).get_by_id(id).await.into())
}

/// PATCH /api/{collection}/{id}
pub(crate) async fn update_one<T: Stored>(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<T>> {
    let id = path_id(&raw)?;
    let Json(partial) = payload?;
    Ok(T::store(&state.book).update(id, partial).await.into())
}

/// DELETE /api/{collection}/{id}
pub(crate) async fn delete_one<T: Stored>(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<ApiResponse<bool>> {
    let id = path_id(&raw)?;
    Ok(T::store(&state.book).delete(id).await.into())
}

/// GET /api/farms/{id}/{collection}
pub(crate) async fn owned_by<T: Stored>(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<ApiResponse<Vec<T>>> {
    let owner_id = path_id(&raw)?;
    Ok(T::store(&state.book).get_by_owner(owner_id).await.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ids() {
        assert_eq!(path_id("7").unwrap(), 7);
        assert_eq!(path_id("-3").unwrap(), -3);
        assert!(path_id("seven").is_err());
        assert!(path_id("").is_err());
    }
}

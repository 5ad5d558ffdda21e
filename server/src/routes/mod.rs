//! HTTP route definitions.

mod crops;
mod dashboard;
mod farms;
mod health;
mod records;
mod tasks;
mod transactions;
mod weather;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(farms::routes())
        .merge(crops::routes())
        .merge(tasks::routes())
        .merge(transactions::routes())
        .merge(weather::routes())
        .merge(dashboard::routes())
}

//! Health check endpoint.

use axum::{extract::State, routing::get, Router};
use farmdesk_engine::Envelope;
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;
use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub simulate_latency: bool,
}

/// Create health routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    ApiResponse::new(Envelope::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        simulate_latency: state.config.simulate_latency,
    }))
}

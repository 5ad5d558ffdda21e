//! Weather routes. Read-only.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use farmdesk_engine::weather::{ForecastDay, WeatherAlert, WeatherSnapshot, DEFAULT_FORECAST_DAYS};
use serde::Deserialize;

use crate::error::Result;
use crate::response::ApiResponse;
use crate::services::WeatherAdvice;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ForecastParams {
    pub days: Option<usize>,
}

/// Create weather routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/weather/current", get(current))
        .route("/api/weather/forecast", get(forecast))
        .route("/api/weather/alerts", get(alerts))
        .route("/api/weather/advice", get(advice))
}

async fn current(State(state): State<AppState>) -> ApiResponse<WeatherSnapshot> {
    state.book.weather.current().await.into()
}

/// GET /api/weather/forecast?days=
async fn forecast(
    State(state): State<AppState>,
    params: std::result::Result<Query<ForecastParams>, QueryRejection>,
) -> Result<ApiResponse<Vec<ForecastDay>>> {
    let Query(params) = params?;
    let days = params.days.unwrap_or(DEFAULT_FORECAST_DAYS);
    Ok(state.book.weather.forecast(days).await.into())
}

async fn alerts(State(state): State<AppState>) -> ApiResponse<Vec<WeatherAlert>> {
    state.book.weather.alerts().await.into()
}

async fn advice(State(state): State<AppState>) -> ApiResponse<WeatherAdvice> {
    state.book.weather_advice().await.into()
}

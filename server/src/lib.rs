//! Farmdesk Server - farm dashboard backend.
//!
//! Wraps the farmdesk-engine collections in async, latency-simulating record
//! stores and serves them, together with read-only weather data, over an
//! HTTP JSON API. Every endpoint answers with the `{ success, data, error }`
//! envelope.

pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::FarmBook;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub book: Arc<FarmBook>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(book: FarmBook, config: Config) -> Self {
        Self {
            book: Arc::new(book),
            config: Arc::new(config),
        }
    }

    /// Build the farm book from `config` and wrap both.
    pub fn from_config(config: Config) -> error::Result<Self> {
        let book = FarmBook::from_config(&config)?;
        Ok(Self::new(book, config))
    }
}

/// The application router with tracing and CORS layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

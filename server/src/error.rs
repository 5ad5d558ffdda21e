//! Unified error handling for the server.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use farmdesk_engine::{Envelope, ErrorKind};

use crate::config::ConfigError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Engine(#[from] farmdesk_engine::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),
}

impl AppError {
    /// The envelope error kind this failure is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Engine(e) => e.kind(),
            AppError::Json(_) | AppError::Query(_) => ErrorKind::InvalidArgument,
            AppError::Config(_) | AppError::Io(_) => ErrorKind::StoreFault,
        }
    }
}

/// HTTP status for an envelope error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::StoreFault => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match kind {
            ErrorKind::StoreFault => tracing::error!("Request failed: {}", self),
            _ => tracing::warn!("Request rejected: {}", self),
        }

        let body: Envelope<()> = Envelope {
            success: false,
            data: None,
            error: Some(self.to_string()),
            kind: Some(kind),
        };

        (status_for(kind), Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use farmdesk_engine::Error;

    #[test]
    fn kinds_map_to_status() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::InvalidArgument), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorKind::StoreFault),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn engine_errors_keep_their_kind() {
        let err = AppError::from(Error::InvalidId("abc".into()));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "invalid id: abc (expected a positive integer)");

        let err = AppError::from(Error::Fault("boom".into()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn config_errors_are_faults() {
        let err = AppError::from(ConfigError::InvalidPort("x".into()));
        assert_eq!(err.kind(), ErrorKind::StoreFault);
    }
}

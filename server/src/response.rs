//! Envelope responses with status codes derived from the error kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use farmdesk_engine::Envelope;
use serde::Serialize;

use crate::error::status_for;

/// An envelope sent with the status its outcome calls for.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T> ApiResponse<T> {
    /// 200 on success, otherwise the status of the error kind.
    pub fn new(envelope: Envelope<T>) -> Self {
        Self::with_success_status(envelope, StatusCode::OK)
    }

    /// 201 on success, otherwise the status of the error kind.
    pub fn created(envelope: Envelope<T>) -> Self {
        Self::with_success_status(envelope, StatusCode::CREATED)
    }

    fn with_success_status(envelope: Envelope<T>, success: StatusCode) -> Self {
        let status = match (envelope.success, envelope.kind) {
            (true, _) => success,
            (false, Some(kind)) => status_for(kind),
            (false, None) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, envelope }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T> From<Envelope<T>> for ApiResponse<T> {
    fn from(envelope: Envelope<T>) -> Self {
        Self::new(envelope)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmdesk_engine::Error;

    #[test]
    fn status_follows_outcome() {
        assert_eq!(ApiResponse::new(Envelope::ok(1)).status(), StatusCode::OK);
        assert_eq!(
            ApiResponse::created(Envelope::ok(1)).status(),
            StatusCode::CREATED
        );

        let missing: Envelope<u8> = Envelope::err(&Error::RecordNotFound {
            collection: "farms".into(),
            id: 9,
        });
        assert_eq!(
            ApiResponse::created(missing).status(),
            StatusCode::NOT_FOUND
        );
    }
}

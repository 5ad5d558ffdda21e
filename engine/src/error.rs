//! Error types for the Farmdesk engine.

use crate::{CollectionName, RecordId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure taxonomy surfaced to callers through the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The operation targets an Id that is not in the collection.
    NotFound,
    /// Malformed id, payload, or field value.
    InvalidArgument,
    /// Anything unexpected inside the store.
    StoreFault,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NotFound"),
            ErrorKind::InvalidArgument => write!(f, "InvalidArgument"),
            ErrorKind::StoreFault => write!(f, "StoreFault"),
        }
    }
}

/// All possible errors from the Farmdesk engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Lookup errors
    #[error("{collection} record {id} not found")]
    RecordNotFound {
        collection: CollectionName,
        id: RecordId,
    },

    // Argument errors
    #[error("invalid id: {0} (expected a positive integer)")]
    InvalidId(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("invalid month: {year}-{month:02} (expected a month from 1 to 12)")]
    InvalidMonth { year: i32, month: u32 },

    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    #[error("type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },

    #[error("invalid value for field '{field}': '{value}' is not one of {allowed}")]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("field '{0}' must be a positive number")]
    NotPositive(String),

    #[error("field '{0}' is out of range")]
    OutOfRange(String),

    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("collection '{0}' has no owner field")]
    NoOwnerField(CollectionName),

    #[error("duplicate id {id} in {collection}")]
    DuplicateId {
        collection: CollectionName,
        id: RecordId,
    },

    #[error("invalid seed data: {0}")]
    InvalidSeed(String),

    // Internal errors
    #[error("store fault: {0}")]
    Fault(String),
}

impl Error {
    /// Classify this error into the coarse taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RecordNotFound { .. } => ErrorKind::NotFound,
            Error::Fault(_) => ErrorKind::StoreFault,
            Error::InvalidId(_)
            | Error::InvalidPayload(_)
            | Error::InvalidMonth { .. }
            | Error::MissingRequiredField(_)
            | Error::TypeMismatch { .. }
            | Error::InvalidEnumValue { .. }
            | Error::NotPositive(_)
            | Error::OutOfRange(_)
            | Error::ConstraintViolation(_)
            | Error::NoOwnerField(_)
            | Error::DuplicateId { .. }
            | Error::InvalidSeed(_) => ErrorKind::InvalidArgument,
        }
    }

    pub(crate) fn not_found(collection: &str, id: RecordId) -> Self {
        Error::RecordNotFound {
            collection: collection.to_string(),
            id,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Fault(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

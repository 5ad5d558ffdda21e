//! The response envelope every store operation returns.

use crate::{error::Result, Error, ErrorKind};
use serde::{Deserialize, Serialize};

/// `{ success, data, error }` wrapper.
///
/// On success `data` holds the payload and `error` is null. On failure `data`
/// is null and `error` carries the message. `kind` classifies the failure and
/// is omitted on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl<T> Envelope<T> {
    /// A successful envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            kind: None,
        }
    }

    /// A failed envelope built from an engine error.
    pub fn err(error: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            kind: Some(error.kind()),
        }
    }

    /// Convert a result, turning any error into a failed envelope.
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(&e),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Map the payload, keeping the failure state.
    pub fn map<U, F>(self, f: F) -> Envelope<U>
    where
        F: FnOnce(T) -> U,
    {
        Envelope {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            kind: self.kind,
        }
    }

    /// The payload, or this failure re-typed for another payload. Lets
    /// callers combine several envelopes with `?`.
    pub fn into_data<U>(self) -> std::result::Result<T, Envelope<U>> {
        match self.data {
            Some(data) if self.success => Ok(data),
            _ => Err(Envelope {
                success: false,
                data: None,
                error: self.error,
                kind: self.kind.or(Some(ErrorKind::StoreFault)),
            }),
        }
    }
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        Self::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_shape() {
        let envelope = Envelope::ok(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "data": [1, 2], "error": null})
        );
    }

    #[test]
    fn failure_shape() {
        let envelope: Envelope<bool> = Envelope::err(&Error::RecordNotFound {
            collection: "farms".into(),
            id: 99,
        });
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": false,
                "data": null,
                "error": "farms record 99 not found",
                "kind": "notFound"
            })
        );
    }

    #[test]
    fn from_result_and_map() {
        let ok: Envelope<u32> = Ok(2).into();
        assert_eq!(ok.map(|n| n * 10).data, Some(20));

        let failed: Envelope<u32> = Err(Error::InvalidId("0".into())).into();
        let mapped = failed.map(|n| n * 10);
        assert!(!mapped.is_success());
        assert_eq!(mapped.kind, Some(ErrorKind::InvalidArgument));
    }

    #[test]
    fn into_data_carries_the_failure() {
        assert_eq!(Envelope::ok(3).into_data::<String>(), Ok(3));

        let missing: Envelope<u32> = Envelope::err(&Error::not_found("crops", 4));
        let failed = missing.into_data::<String>().unwrap_err();
        assert!(!failed.success);
        assert_eq!(failed.kind, Some(ErrorKind::NotFound));
        assert_eq!(failed.error.as_deref(), Some("crops record 4 not found"));
    }
}

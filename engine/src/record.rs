//! Record types for storing data.

use crate::{error::Result, Error, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the reserved identity field on every record.
pub const ID_FIELD: &str = "Id";

/// Largest Id a record may carry: every Id must be reachable through [`check_id`].
pub const MAX_ID: RecordId = i64::MAX as RecordId;

/// Field values of a record, keyed by field name.
pub type Fields = Map<String, Value>;

/// A data record in a collection.
///
/// Serializes as a flat object: the reserved `Id` next to the entity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier
    #[serde(rename = "Id")]
    pub id: RecordId,
    /// Entity fields (never contains `Id`)
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// Create a record, dropping any `Id` carried in the fields.
    pub fn new(id: RecordId, mut fields: Fields) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        if field == ID_FIELD {
            return None;
        }
        self.fields.get(field)
    }

    /// Read a field as an integer reference (e.g. `farmId`).
    pub fn reference(&self, field: &str) -> Option<RecordId> {
        self.fields.get(field).and_then(Value::as_u64)
    }

    /// Shallow-merge `partial` over this record's fields. `Id` is never touched.
    pub fn merge(&mut self, partial: &Fields) {
        for (key, value) in partial {
            if key == ID_FIELD {
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Convert to a flat JSON object.
    pub fn to_value(&self) -> Value {
        let mut obj = self.fields.clone();
        obj.insert(ID_FIELD.to_string(), Value::from(self.id));
        Value::Object(obj)
    }
}

/// Validate a caller-supplied id.
pub fn check_id(id: i64) -> Result<RecordId> {
    if id > 0 {
        Ok(id as RecordId)
    } else {
        Err(Error::InvalidId(id.to_string()))
    }
}

/// Parse an id from its textual form (path segments, query strings).
pub fn parse_id(raw: &str) -> Result<RecordId> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidId(raw.to_string()))?;
    check_id(id)
}

/// Turn an arbitrary JSON value into record fields.
pub fn into_fields(value: Value) -> Result<Fields> {
    match value {
        Value::Object(obj) => Ok(obj),
        other => Err(Error::InvalidPayload(format!(
            "expected an object, got {}",
            crate::schema::json_type_name(&other)
        ))),
    }
}

//! Schema definition and validation.
//!
//! Each collection declares its fields, its owner reference and any
//! cross-field constraints. Payloads are validated before they are stored.

use crate::{error::Result, record::Fields, CollectionName, Error};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field types supported in schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Int,
    /// Integer or decimal number within the range of [`Decimal`]
    Number,
    Bool,
    /// Calendar date, `YYYY-MM-DD`
    Date,
    /// RFC 3339 timestamp
    Timestamp,
    /// String restricted to a fixed set of values
    Enum(Vec<String>),
    /// Arbitrary nested JSON
    Json,
}

impl FieldType {
    /// Build an enum type from a list of allowed values.
    pub fn one_of(values: &[&str]) -> Self {
        FieldType::Enum(values.iter().map(|v| v.to_string()).collect())
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "String"),
            FieldType::Int => write!(f, "Int"),
            FieldType::Number => write!(f, "Number"),
            FieldType::Bool => write!(f, "Bool"),
            FieldType::Date => write!(f, "Date"),
            FieldType::Timestamp => write!(f, "Timestamp"),
            FieldType::Enum(values) => write!(f, "Enum[{}]", values.join(", ")),
            FieldType::Json => write!(f, "Json"),
        }
    }
}

/// Definition of a field in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: FieldType,
    /// Whether this field is required
    pub required: bool,
    /// Numbers must be strictly greater than zero
    #[serde(default)]
    pub positive: bool,
    /// Stamped by the store on create when the caller leaves it out
    #[serde(default)]
    pub generated: bool,
}

impl FieldDef {
    /// Create a new required field definition.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            positive: false,
            generated: false,
        }
    }

    /// Create a new optional field definition.
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type)
        }
    }

    /// Create a creation timestamp field the store fills in.
    pub fn created_at(name: impl Into<String>) -> Self {
        Self {
            generated: true,
            ..Self::required(name, FieldType::Timestamp)
        }
    }

    /// Require a strictly positive number.
    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    /// Validate a JSON value against this field definition.
    pub fn validate(&self, value: Option<&Value>) -> Result<()> {
        match value {
            None | Some(Value::Null) if self.required => {
                Err(Error::MissingRequiredField(self.name.clone()))
            }
            None | Some(Value::Null) => Ok(()),
            Some(Value::String(s)) if self.required && s.trim().is_empty() => {
                Err(Error::MissingRequiredField(self.name.clone()))
            }
            Some(v) => self.validate_value(v),
        }
    }

    fn validate_value(&self, value: &Value) -> Result<()> {
        let valid = match &self.field_type {
            FieldType::String => value.is_string(),
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::Number if value.is_number() => {
                if parse_decimal(value).is_none() {
                    return Err(Error::OutOfRange(self.name.clone()));
                }
                true
            }
            FieldType::Number => false,
            FieldType::Bool => value.is_boolean(),
            FieldType::Date => value.as_str().is_some_and(|s| parse_date(s).is_some()),
            FieldType::Timestamp => value.as_str().is_some_and(|s| parse_timestamp(s).is_some()),
            FieldType::Enum(allowed) => {
                let Some(s) = value.as_str() else {
                    return Err(self.mismatch(value));
                };
                if !allowed.iter().any(|a| a == s) {
                    return Err(Error::InvalidEnumValue {
                        field: self.name.clone(),
                        value: s.to_string(),
                        allowed: allowed.join(", "),
                    });
                }
                true
            }
            FieldType::Json => true,
        };

        if !valid {
            return Err(self.mismatch(value));
        }

        let not_positive = match self.field_type {
            FieldType::Number => parse_decimal(value).is_some_and(|n| n <= Decimal::ZERO),
            _ => value.as_f64().is_some_and(|n| n <= 0.0),
        };
        if self.positive && not_positive {
            return Err(Error::NotPositive(self.name.clone()));
        }

        Ok(())
    }

    fn mismatch(&self, value: &Value) -> Error {
        Error::TypeMismatch {
            field: self.name.clone(),
            expected: self.field_type.to_string(),
            got: json_type_name(value).to_string(),
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "Int",
        Value::Number(_) => "Float",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

/// Parse a `YYYY-MM-DD` date. Anything with a time part is rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    raw.parse().ok()
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .and_then(|_| raw.parse().ok())
}

/// Read a JSON number the way decimal entity fields deserialize it.
fn parse_decimal(value: &Value) -> Option<Decimal> {
    serde_json::from_value(value.clone()).ok()
}

/// A rule spanning more than one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Constraint {
    /// `field` must be a date strictly after `earlier`.
    DateAfter { field: String, earlier: String },
}

impl Constraint {
    /// Check the constraint. Missing fields are left to the field rules.
    pub fn check(&self, payload: &Fields) -> Result<()> {
        match self {
            Constraint::DateAfter { field, earlier } => {
                let date = |name: &str| payload.get(name).and_then(Value::as_str).and_then(parse_date);
                if let (Some(later), Some(before)) = (date(field), date(earlier)) {
                    if later <= before {
                        return Err(Error::ConstraintViolation(format!(
                            "{field} must be after {earlier}"
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Schema for a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    /// Collection name
    pub name: CollectionName,
    /// Field definitions
    pub fields: Vec<FieldDef>,
    /// Foreign-key field used by owner queries
    pub owner: Option<String>,
    /// Cross-field rules
    pub constraints: Vec<Constraint>,
}

impl CollectionSchema {
    /// Create a new collection schema.
    pub fn new(name: impl Into<CollectionName>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
            owner: None,
            constraints: Vec::new(),
        }
    }

    /// Declare the owner reference field.
    pub fn owned_by(mut self, field: impl Into<String>) -> Self {
        self.owner = Some(field.into());
        self
    }

    /// Add a cross-field constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Get a field definition by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fill in generated fields the caller left out.
    pub fn stamp_generated(&self, payload: &mut Fields, now: DateTime<Utc>) {
        for field in self.fields.iter().filter(|f| f.generated) {
            let missing = payload.get(&field.name).map_or(true, Value::is_null);
            if missing {
                payload.insert(field.name.clone(), Value::from(now.to_rfc3339()));
            }
        }
    }

    /// Validate a payload against this schema.
    pub fn validate_payload(&self, payload: &Fields) -> Result<()> {
        for field in &self.fields {
            field.validate(payload.get(&field.name))?;
        }
        for constraint in &self.constraints {
            constraint.check(payload)?;
        }
        Ok(())
    }
}

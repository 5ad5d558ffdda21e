use super::Entity;
use crate::{
    query::Query,
    schema::{FieldDef, FieldType},
    CollectionSchema, RecordId,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit the farm size is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeUnit {
    Acres,
    Hectares,
    SquareFeet,
    SquareMeters,
}

impl SizeUnit {
    pub const NAMES: [&'static str; 4] = ["acres", "hectares", "square_feet", "square_meters"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeUnit::Acres => "acres",
            SizeUnit::Hectares => "hectares",
            SizeUnit::SquareFeet => "square_feet",
            SizeUnit::SquareMeters => "square_meters",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub name: String,
    pub location: String,
    pub size: Decimal,
    pub size_unit: SizeUnit,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a farm. `createdAt` is stamped by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFarm {
    pub name: String,
    pub location: String,
    pub size: Decimal,
    pub size_unit: SizeUnit,
}

impl Farm {
    /// Case-insensitive search over name and location.
    pub fn search(term: &str) -> Query {
        Query::new().search(&["name", "location"], term)
    }
}

impl Entity for Farm {
    const COLLECTION: &'static str = "farms";

    fn schema() -> CollectionSchema {
        CollectionSchema::new(
            Self::COLLECTION,
            vec![
                FieldDef::required("name", FieldType::String),
                FieldDef::required("location", FieldType::String),
                FieldDef::required("size", FieldType::Number).positive(),
                FieldDef::required("sizeUnit", FieldType::one_of(&SizeUnit::NAMES)),
                FieldDef::created_at("createdAt"),
            ],
        )
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

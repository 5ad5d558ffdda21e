use super::Entity;
use crate::{
    query::Query,
    schema::{Constraint, FieldDef, FieldType},
    CollectionSchema, RecordId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Growth stage of a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropStatus {
    Planted,
    Growing,
    Ready,
    Harvested,
}

impl CropStatus {
    pub const NAMES: [&'static str; 4] = ["planted", "growing", "ready", "harvested"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropStatus::Planted => "planted",
            CropStatus::Growing => "growing",
            CropStatus::Ready => "ready",
            CropStatus::Harvested => "harvested",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub farm_id: RecordId,
    pub name: String,
    pub variety: String,
    pub field_location: String,
    pub planting_date: NaiveDate,
    pub expected_harvest: NaiveDate,
    pub status: CropStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCrop {
    pub farm_id: RecordId,
    pub name: String,
    pub variety: String,
    pub field_location: String,
    pub planting_date: NaiveDate,
    pub expected_harvest: NaiveDate,
    pub status: CropStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Crop {
    /// Anything not yet harvested counts as active.
    pub fn is_active(&self) -> bool {
        self.status != CropStatus::Harvested
    }

    /// Search over name, variety and field location, optionally narrowed to
    /// one status.
    pub fn search(term: &str, status: Option<CropStatus>) -> Query {
        let query = Query::new().search(&["name", "variety", "fieldLocation"], term);
        match status {
            Some(status) => query.eq("status", status.as_str()),
            None => query,
        }
    }
}

impl Entity for Crop {
    const COLLECTION: &'static str = "crops";

    fn schema() -> CollectionSchema {
        CollectionSchema::new(
            Self::COLLECTION,
            vec![
                FieldDef::required("farmId", FieldType::Int).positive(),
                FieldDef::required("name", FieldType::String),
                FieldDef::required("variety", FieldType::String),
                FieldDef::required("fieldLocation", FieldType::String),
                FieldDef::required("plantingDate", FieldType::Date),
                FieldDef::required("expectedHarvest", FieldType::Date),
                FieldDef::required("status", FieldType::one_of(&CropStatus::NAMES)),
                FieldDef::optional("notes", FieldType::String),
            ],
        )
        .owned_by("farmId")
        .with_constraint(Constraint::DateAfter {
            field: "expectedHarvest".into(),
            earlier: "plantingDate".into(),
        })
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

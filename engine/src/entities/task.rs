use super::Entity;
use crate::{
    schema::{FieldDef, FieldType},
    CollectionSchema, RecordId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const NAMES: [&'static str; 4] = ["low", "medium", "high", "urgent"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub const NAMES: [&'static str; 2] = ["pending", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    /// Pending becomes completed and vice versa.
    pub fn toggled(&self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub farm_id: RecordId,
    #[serde(default)]
    pub crop_id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub farm_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_id: Option<RecordId>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    /// Pending and due on `day`.
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.is_pending() && self.due_date == day
    }
}

impl Entity for Task {
    const COLLECTION: &'static str = "tasks";

    fn schema() -> CollectionSchema {
        CollectionSchema::new(
            Self::COLLECTION,
            vec![
                FieldDef::required("farmId", FieldType::Int).positive(),
                FieldDef::optional("cropId", FieldType::Int).positive(),
                FieldDef::required("title", FieldType::String),
                FieldDef::optional("description", FieldType::String),
                FieldDef::required("dueDate", FieldType::Date),
                FieldDef::required("priority", FieldType::one_of(&Priority::NAMES)),
                FieldDef::required("status", FieldType::one_of(&TaskStatus::NAMES)),
            ],
        )
        .owned_by("farmId")
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

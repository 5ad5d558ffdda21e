//! Seed data for preloading collections.
//!
//! A seed document lists records per collection, each carrying its own `Id`.
//! Loading validates every record against its collection schema and the Id
//! sequence continues after the highest seeded Id.

use crate::{
    entities::{Crop, Entity, Farm, Task, Transaction},
    error::Result,
    Collection, Error,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version of the seed format for future compatibility.
pub const SEED_FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    SEED_FORMAT_VERSION
}

/// Records to preload, keyed by collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default)]
    pub farms: Vec<Value>,
    #[serde(default)]
    pub crops: Vec<Value>,
    #[serde(default)]
    pub tasks: Vec<Value>,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

impl SeedData {
    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let seed: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSeed(e.to_string()))?;

        if seed.format_version > SEED_FORMAT_VERSION {
            return Err(Error::InvalidSeed(format!(
                "unsupported seed format version: {} (max supported: {})",
                seed.format_version, SEED_FORMAT_VERSION
            )));
        }

        Ok(seed)
    }

    /// Capture the current contents of the four entity collections.
    pub fn capture(
        farms: &Collection,
        crops: &Collection,
        tasks: &Collection,
        transactions: &Collection,
    ) -> Self {
        let values =
            |c: &Collection| -> Vec<Value> { c.records().iter().map(|r| r.to_value()).collect() };
        Self {
            format_version: SEED_FORMAT_VERSION,
            farms: values(farms),
            crops: values(crops),
            tasks: values(tasks),
            transactions: values(transactions),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSeed(e.to_string()))
    }

    /// Seed records destined for `collection`.
    pub fn records_for(&self, collection: &str) -> Result<&[Value]> {
        match collection {
            c if c == Farm::COLLECTION => Ok(&self.farms),
            c if c == Crop::COLLECTION => Ok(&self.crops),
            c if c == Task::COLLECTION => Ok(&self.tasks),
            c if c == Transaction::COLLECTION => Ok(&self.transactions),
            other => Err(Error::InvalidSeed(format!("unknown collection '{other}'"))),
        }
    }

    /// Load this seed's records for `collection` into it.
    pub fn load_into(&self, collection: &mut Collection) -> Result<usize> {
        let records = self.records_for(collection.name())?.to_vec();
        let count = records.len();
        collection.load(records)?;
        Ok(count)
    }

    /// Total records across all collections.
    pub fn record_count(&self) -> usize {
        self.farms.len() + self.crops.len() + self.tasks.len() + self.transactions.len()
    }
}

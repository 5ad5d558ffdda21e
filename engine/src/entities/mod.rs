//! Typed entities stored in collections.
//!
//! Each entity registers its collection name and schema; the generic store
//! does the rest. Records are converted to entities through serde, so a
//! record that passed schema validation always deserializes.

mod crop;
mod farm;
mod task;
mod transaction;

pub use crop::{Crop, CropStatus, NewCrop};
pub use farm::{Farm, NewFarm, SizeUnit};
pub use task::{NewTask, Priority, Task, TaskStatus};
pub use transaction::{
    NewTransaction, Transaction, TransactionFilter, TransactionSummary, TransactionType,
};

use crate::{error::Result, record::Record, CollectionSchema, Error, RecordId};
use serde::{de::DeserializeOwned, Serialize};

/// A record type with its own collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name, also used in error messages.
    const COLLECTION: &'static str;

    /// Field set and validation rules for the collection.
    fn schema() -> CollectionSchema;

    /// The store-assigned Id.
    fn id(&self) -> RecordId;

    /// Convert a stored record into the typed entity.
    fn from_record(record: &Record) -> Result<Self> {
        serde_json::from_value(record.to_value()).map_err(|e| {
            Error::Fault(format!(
                "{} record {} is malformed: {e}",
                Self::COLLECTION,
                record.id
            ))
        })
    }
}

/// Convert a batch of records, failing on the first malformed one.
pub fn from_records<'a, T, I>(records: I) -> Result<Vec<T>>
where
    T: Entity,
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().map(T::from_record).collect()
}

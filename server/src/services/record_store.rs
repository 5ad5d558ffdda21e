//! Async record store over one engine collection.
//!
//! Every operation sleeps for its simulated latency, then takes the
//! collection lock and does all of its work in one step. Nothing is
//! propagated past the store: each call answers with an [`Envelope`].

use std::marker::PhantomData;

use chrono::Utc;
use farmdesk_engine::{
    entities::{from_records, Entity},
    record::{check_id, into_fields},
    Collection, Envelope, Error, ErrorKind, Fields, IdStrategy, Query,
};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use super::latency::{Latency, Op};

/// A collection of `T` behind an async mutex.
#[derive(Debug)]
pub struct RecordStore<T> {
    collection: Mutex<Collection>,
    latency: Latency,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> RecordStore<T> {
    /// An empty store using `T`'s schema.
    pub fn new(strategy: IdStrategy, latency: Latency) -> Self {
        Self::from_collection(Collection::with_strategy(T::schema(), strategy), latency)
    }

    /// Wrap an already populated collection.
    pub fn from_collection(collection: Collection, latency: Latency) -> Self {
        Self {
            collection: Mutex::new(collection),
            latency,
            _entity: PhantomData,
        }
    }

    /// Every record, in insertion order.
    pub async fn list(&self) -> Envelope<Vec<T>> {
        self.latency.wait(Op::List).await;
        let collection = self.collection.lock().await;
        finish(T::COLLECTION, Op::List, None, from_records(collection.records()))
    }

    /// The record with Id `id`.
    pub async fn get_by_id(&self, id: i64) -> Envelope<T> {
        self.latency.wait(Op::Get).await;
        let result = match check_id(id) {
            Ok(id) => {
                let collection = self.collection.lock().await;
                collection.get(id).and_then(T::from_record)
            }
            Err(e) => Err(e),
        };
        finish(T::COLLECTION, Op::Get, Some(id), result)
    }

    /// Records whose owner field equals `owner_id`. No matches is an empty list.
    pub async fn get_by_owner(&self, owner_id: i64) -> Envelope<Vec<T>> {
        self.latency.wait(Op::Owner).await;
        let result = match check_id(owner_id) {
            Ok(owner_id) => {
                let collection = self.collection.lock().await;
                collection
                    .by_owner(owner_id)
                    .and_then(|records| from_records(&records))
            }
            Err(e) => Err(e),
        };
        finish(T::COLLECTION, Op::Owner, Some(owner_id), result)
    }

    /// Validate and store a new record. Any `Id` in `draft` is ignored.
    pub async fn create(&self, draft: impl Serialize) -> Envelope<T> {
        self.latency.wait(Op::Create).await;
        let result = match to_fields(&draft) {
            Ok(fields) => {
                let mut collection = self.collection.lock().await;
                collection.create_as(fields, Utc::now(), T::from_record)
            }
            Err(e) => Err(e),
        };
        finish(T::COLLECTION, Op::Create, None, result)
    }

    /// Shallow-merge `partial` over the record with Id `id`.
    pub async fn update(&self, id: i64, partial: impl Serialize) -> Envelope<T> {
        self.latency.wait(Op::Update).await;
        let result = match (check_id(id), to_fields(&partial)) {
            (Ok(id), Ok(partial)) => {
                let mut collection = self.collection.lock().await;
                update_typed(&mut collection, id, &partial)
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        finish(T::COLLECTION, Op::Update, Some(id), result)
    }

    /// Update a record with changes computed from its current state, under
    /// one lock.
    pub async fn update_with<F>(&self, id: i64, changes: F) -> Envelope<T>
    where
        F: FnOnce(&T) -> Fields,
    {
        self.latency.wait(Op::Update).await;
        let result = match check_id(id) {
            Ok(id) => {
                let mut collection = self.collection.lock().await;
                match collection.get(id).and_then(T::from_record) {
                    Ok(current) => update_typed(&mut collection, id, &changes(&current)),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };
        finish(T::COLLECTION, Op::Update, Some(id), result)
    }

    /// Remove the record with Id `id`.
    pub async fn delete(&self, id: i64) -> Envelope<bool> {
        self.latency.wait(Op::Delete).await;
        let result = match check_id(id) {
            Ok(id) => {
                let mut collection = self.collection.lock().await;
                collection.delete(id).map(|_| true)
            }
            Err(e) => Err(e),
        };
        finish(T::COLLECTION, Op::Delete, Some(id), result)
    }

    /// Records matching `query`, with list latency.
    pub async fn find(&self, query: &Query) -> Envelope<Vec<T>> {
        self.find_as(Op::List, query).await
    }

    /// Records matching `query`, with the latency of `op`.
    pub async fn find_as(&self, op: Op, query: &Query) -> Envelope<Vec<T>> {
        self.latency.wait(op).await;
        let collection = self.collection.lock().await;
        let hits = query.run(collection.records());
        finish(T::COLLECTION, op, None, from_records(hits))
    }

    /// Lock the collection without any simulated latency.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, Collection> {
        self.collection.lock().await
    }
}

fn to_fields(value: &impl Serialize) -> farmdesk_engine::error::Result<Fields> {
    let value = serde_json::to_value(value).map_err(|e| Error::InvalidPayload(e.to_string()))?;
    into_fields(value)
}

fn update_typed<T: Entity>(
    collection: &mut Collection,
    id: u64,
    partial: &Fields,
) -> farmdesk_engine::error::Result<T> {
    collection.update_as(id, partial, T::from_record)
}

/// Log the outcome of a store operation and wrap it in an envelope.
pub(crate) fn finish<U>(
    collection: &str,
    op: Op,
    id: Option<i64>,
    result: farmdesk_engine::error::Result<U>,
) -> Envelope<U> {
    log_outcome(collection, op, id, result.as_ref().err());
    Envelope::from_result(result)
}

pub(crate) fn log_outcome(collection: &str, op: Op, id: Option<i64>, error: Option<&Error>) {
    match error {
        None => tracing::debug!(collection, op = op.name(), id, "store operation"),
        Some(e) if e.kind() == ErrorKind::StoreFault => {
            tracing::error!(collection, op = op.name(), id, error = %e, "store fault")
        }
        Some(e) => tracing::warn!(collection, op = op.name(), id, error = %e, "store operation failed"),
    }
}

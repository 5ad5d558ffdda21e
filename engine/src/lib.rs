//! # Farmdesk Engine
//!
//! The in-memory record store behind the Farmdesk farm dashboard.
//!
//! This crate holds the core logic shared by every entity service: records,
//! schemas, Id assignment, the response envelope and read queries. The same
//! contract serves farms, crops, tasks and transactions.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine knows nothing about files, network, clocks or timers;
//!   callers pass the current time in
//! - **One contract**: every collection exposes the same list/get/create/update/delete
//!   operations; entities only register their schema
//! - **Explicit instances**: collections are plain values, so tests never share state
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Record`] is a flat map of field values plus the reserved `Id`. The Id is
//! assigned by the collection, never by the caller, and never changes.
//!
//! ### Collections
//!
//! A [`Collection`] keeps records in insertion order and validates every write
//! against its [`CollectionSchema`]. New Ids follow the collection's
//! [`IdStrategy`]:
//! - [`IdStrategy::HighWater`] - one past the highest Id ever issued (default)
//! - [`IdStrategy::MaxExisting`] - one past the highest Id currently present
//!
//! ### Envelopes
//!
//! Store operations answer with an [`Envelope`]: `{ success, data, error }`.
//! Errors carry an [`ErrorKind`] of `NotFound`, `InvalidArgument` or `StoreFault`.
//!
//! ## Quick Start
//!
//! ```rust
//! use farmdesk_engine::{entities::{Entity, Farm}, record::into_fields, Collection, Envelope};
//! use chrono::Utc;
//! use serde_json::json;
//!
//! let mut farms = Collection::new(Farm::schema());
//!
//! let fields = into_fields(json!({
//!     "name": "Green Valley",
//!     "location": "CA",
//!     "size": 40,
//!     "sizeUnit": "acres"
//! }))
//! .unwrap();
//!
//! let envelope = Envelope::from_result(farms.create(fields, Utc::now()));
//! assert!(envelope.success);
//! assert_eq!(envelope.data.unwrap().id, 1);
//!
//! let missing = Envelope::from_result(farms.get(99).cloned());
//! assert!(!missing.success);
//! assert!(missing.data.is_none());
//! ```

pub mod entities;
pub mod envelope;
pub mod error;
pub mod query;
pub mod record;
pub mod schema;
pub mod seed;
pub mod store;
pub mod weather;

// Re-export main types at crate root
pub use envelope::Envelope;
pub use error::{Error, ErrorKind};
pub use query::{Filter, Query, QueryBuilder, Sort};
pub use record::{Fields, Record};
pub use schema::{CollectionSchema, Constraint, FieldDef, FieldType};
pub use seed::{SeedData, SEED_FORMAT_VERSION};
pub use store::{Collection, IdStrategy};

/// Type aliases for clarity
pub type RecordId = u64;
pub type CollectionName = String;

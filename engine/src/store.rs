//! Collection - the in-memory record container.
//!
//! A collection holds the records of one entity type in insertion order,
//! assigns identifiers, and validates every write against its schema.

use crate::{
    error::Result,
    query::QueryBuilder,
    record::{Fields, Record, MAX_ID},
    CollectionSchema, Error, RecordId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a collection picks the Id of a new record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    /// One past the highest Id ever issued. Ids are never reused.
    #[default]
    HighWater,
    /// One past the highest Id currently present.
    MaxExisting,
}

impl std::str::FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high-water" | "high_water" | "highwater" => Ok(IdStrategy::HighWater),
            "max-existing" | "max_existing" | "maxexisting" => Ok(IdStrategy::MaxExisting),
            other => Err(format!("unknown id strategy '{other}'")),
        }
    }
}

/// A collection of records of one entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    schema: CollectionSchema,
    strategy: IdStrategy,
    records: Vec<Record>,
    /// Highest Id ever issued or seeded
    high_water: RecordId,
}

impl Collection {
    /// Create an empty collection with the default Id strategy.
    pub fn new(schema: CollectionSchema) -> Self {
        Self::with_strategy(schema, IdStrategy::default())
    }

    /// Create an empty collection with an explicit Id strategy.
    pub fn with_strategy(schema: CollectionSchema, strategy: IdStrategy) -> Self {
        Self {
            schema,
            strategy,
            records: Vec::new(),
            high_water: 0,
        }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Get the schema.
    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    /// Get the Id strategy.
    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Count of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if collection has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Shallow copy of the whole collection, insertion order preserved.
    pub fn list(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Query records in this collection.
    pub fn query(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.records)
    }

    /// Get a record by Id.
    pub fn get(&self, id: RecordId) -> Result<&Record> {
        let index = self.position(id)?;
        Ok(&self.records[index])
    }

    /// All records whose owner field equals `owner_id`.
    pub fn by_owner(&self, owner_id: RecordId) -> Result<Vec<Record>> {
        let owner = self
            .schema
            .owner
            .as_deref()
            .ok_or_else(|| Error::NoOwnerField(self.schema.name.clone()))?;
        if owner_id == 0 {
            return Err(Error::InvalidId(owner_id.to_string()));
        }
        Ok(self.query().owned_by(owner, owner_id).all().into_iter().cloned().collect())
    }

    /// The Id the next create will receive.
    ///
    /// Fails once the sequence would pass [`MAX_ID`].
    pub fn next_id(&self) -> Result<RecordId> {
        let max_existing = self.records.iter().map(|r| r.id).max().unwrap_or(0);
        let last = match self.strategy {
            IdStrategy::HighWater => max_existing.max(self.high_water),
            IdStrategy::MaxExisting => max_existing,
        };
        last.checked_add(1)
            .filter(|id| *id <= MAX_ID)
            .ok_or_else(|| Error::Fault(format!("{} has no Ids left", self.schema.name)))
    }

    /// Validate and append a new record. Any caller-supplied `Id` is ignored.
    pub fn create(&mut self, fields: Fields, now: DateTime<Utc>) -> Result<Record> {
        self.create_as(fields, now, |record| Ok(record.clone()))
    }

    /// Like [`create`](Self::create), but `convert` must also accept the
    /// record before it is stored.
    pub fn create_as<T, F>(&mut self, mut fields: Fields, now: DateTime<Utc>, convert: F) -> Result<T>
    where
        F: FnOnce(&Record) -> Result<T>,
    {
        self.schema.stamp_generated(&mut fields, now);
        let record = Record::new(self.next_id()?, fields);
        self.schema.validate_payload(&record.fields)?;
        let converted = convert(&record)?;

        self.high_water = self.high_water.max(record.id);
        self.records.push(record);
        Ok(converted)
    }

    /// Shallow-merge `partial` over a record. The merged record is validated
    /// before it replaces the original.
    pub fn update(&mut self, id: RecordId, partial: &Fields) -> Result<Record> {
        self.update_as(id, partial, |record| Ok(record.clone()))
    }

    /// Like [`update`](Self::update), but `convert` must also accept the
    /// merged record before it replaces the original.
    pub fn update_as<T, F>(&mut self, id: RecordId, partial: &Fields, convert: F) -> Result<T>
    where
        F: FnOnce(&Record) -> Result<T>,
    {
        let index = self.position(id)?;
        let mut merged = self.records[index].clone();
        merged.merge(partial);
        self.schema.validate_payload(&merged.fields)?;
        let converted = convert(&merged)?;

        self.records[index] = merged;
        Ok(converted)
    }

    /// Remove a record and return it.
    pub fn delete(&mut self, id: RecordId) -> Result<Record> {
        let index = self.position(id)?;
        Ok(self.records.remove(index))
    }

    /// Remove every record matching `predicate`, returning how many went.
    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Record) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|r| !predicate(r));
        before - self.records.len()
    }

    /// Merge `partial` into every record matching `predicate`.
    ///
    /// All merged records are validated first; on error nothing changes.
    pub fn merge_where<F>(&mut self, predicate: F, partial: &Fields) -> Result<usize>
    where
        F: Fn(&Record) -> bool,
    {
        let mut staged = Vec::new();
        for (index, record) in self.records.iter().enumerate() {
            if predicate(record) {
                let mut merged = record.clone();
                merged.merge(partial);
                self.schema.validate_payload(&merged.fields)?;
                staged.push((index, merged));
            }
        }

        let count = staged.len();
        for (index, merged) in staged {
            self.records[index] = merged;
        }
        Ok(count)
    }

    /// Insert a record that already carries its Id (seed data).
    pub fn insert_existing(&mut self, record: Record) -> Result<()> {
        if record.id == 0 || record.id > MAX_ID {
            return Err(Error::InvalidId(record.id.to_string()));
        }
        if self.records.iter().any(|r| r.id == record.id) {
            return Err(Error::DuplicateId {
                collection: self.schema.name.clone(),
                id: record.id,
            });
        }
        self.schema.validate_payload(&record.fields)?;

        self.high_water = self.high_water.max(record.id);
        self.records.push(record);
        Ok(())
    }

    /// Load records from a JSON array of flat objects.
    pub fn load(&mut self, records: Vec<Value>) -> Result<()> {
        for value in records {
            let record: Record = serde_json::from_value(value)
                .map_err(|e| Error::InvalidSeed(format!("{}: {e}", self.schema.name)))?;
            self.insert_existing(record)?;
        }
        Ok(())
    }

    fn position(&self, id: RecordId) -> Result<usize> {
        if id == 0 {
            return Err(Error::InvalidId(id.to_string()));
        }
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::not_found(&self.schema.name, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::into_fields;
    use crate::schema::{FieldDef, FieldType};
    use chrono::TimeZone;
    use serde_json::json;

    fn test_schema() -> CollectionSchema {
        CollectionSchema::new(
            "crops",
            vec![
                FieldDef::required("farmId", FieldType::Int).positive(),
                FieldDef::required("name", FieldType::String),
                FieldDef::required("status", FieldType::one_of(&["planted", "harvested"])),
                FieldDef::optional("notes", FieldType::String),
            ],
        )
        .owned_by("farmId")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
    }

    fn crop(farm_id: u64, name: &str) -> Fields {
        into_fields(json!({"farmId": farm_id, "name": name, "status": "planted"})).unwrap()
    }

    fn test_collection() -> Collection {
        Collection::new(test_schema())
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let mut collection = test_collection();
        let first = collection.create(crop(1, "Corn"), now()).unwrap();
        let second = collection.create(crop(1, "Wheat"), now()).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, first.id + 1);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn create_ignores_supplied_id() {
        let mut collection = test_collection();
        let mut fields = crop(1, "Corn");
        fields.insert("Id".into(), json!(500));

        let record = collection.create(fields, now()).unwrap();
        assert_eq!(record.id, 1);
        assert!(record.get("Id").is_none());
    }

    #[test]
    fn create_invalid_leaves_collection_untouched() {
        let mut collection = test_collection();
        let result = collection.create(into_fields(json!({"name": "Corn"})).unwrap(), now());

        assert!(matches!(result, Err(Error::MissingRequiredField(f)) if f == "farmId"));
        assert!(collection.is_empty());
        assert_eq!(collection.next_id().unwrap(), 1);
    }

    #[test]
    fn high_water_never_reuses_ids() {
        let mut collection = test_collection();
        collection.create(crop(1, "Corn"), now()).unwrap();
        let last = collection.create(crop(1, "Wheat"), now()).unwrap();
        collection.delete(last.id).unwrap();

        let next = collection.create(crop(1, "Oats"), now()).unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn max_existing_follows_literal_rule() {
        let mut collection = Collection::with_strategy(test_schema(), IdStrategy::MaxExisting);
        collection.create(crop(1, "Corn"), now()).unwrap();
        let last = collection.create(crop(1, "Wheat"), now()).unwrap();
        collection.delete(last.id).unwrap();

        let next = collection.create(crop(1, "Oats"), now()).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn get_missing_and_invalid() {
        let collection = test_collection();
        assert!(matches!(
            collection.get(9),
            Err(Error::RecordNotFound { id: 9, .. })
        ));
        assert!(matches!(collection.get(0), Err(Error::InvalidId(_))));
    }

    #[test]
    fn update_merges_and_keeps_id() {
        let mut collection = test_collection();
        let created = collection.create(crop(1, "Corn"), now()).unwrap();

        let partial = into_fields(json!({"status": "harvested", "Id": 77})).unwrap();
        let updated = collection.update(created.id, &partial).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.get("status"), Some(&json!("harvested")));
        assert_eq!(updated.get("name"), Some(&json!("Corn")));
        assert_eq!(collection.get(created.id).unwrap(), &updated);
    }

    #[test]
    fn update_invalid_is_rejected_atomically() {
        let mut collection = test_collection();
        let created = collection.create(crop(1, "Corn"), now()).unwrap();

        let partial = into_fields(json!({"status": "eaten"})).unwrap();
        let result = collection.update(created.id, &partial);

        assert!(matches!(result, Err(Error::InvalidEnumValue { .. })));
        assert_eq!(collection.get(created.id).unwrap(), &created);
    }

    #[test]
    fn update_missing() {
        let mut collection = test_collection();
        let result = collection.update(3, &Fields::new());
        assert!(matches!(result, Err(Error::RecordNotFound { id: 3, .. })));
    }

    #[test]
    fn delete_removes_record() {
        let mut collection = test_collection();
        let created = collection.create(crop(1, "Corn"), now()).unwrap();

        let removed = collection.delete(created.id).unwrap();
        assert_eq!(removed, created);
        assert!(matches!(
            collection.get(created.id),
            Err(Error::RecordNotFound { .. })
        ));
        assert!(matches!(
            collection.delete(99),
            Err(Error::RecordNotFound { id: 99, .. })
        ));
    }

    #[test]
    fn by_owner_filters_in_order() {
        let mut collection = test_collection();
        collection.create(crop(1, "Corn"), now()).unwrap();
        collection.create(crop(2, "Rice"), now()).unwrap();
        collection.create(crop(1, "Wheat"), now()).unwrap();

        let owned = collection.by_owner(1).unwrap();
        let names: Vec<_> = owned.iter().map(|r| r.get("name").unwrap().clone()).collect();
        assert_eq!(names, vec![json!("Corn"), json!("Wheat")]);

        assert!(collection.by_owner(5).unwrap().is_empty());
    }

    #[test]
    fn by_owner_without_owner_field() {
        let schema = CollectionSchema::new("farms", vec![FieldDef::required("name", FieldType::String)]);
        let collection = Collection::new(schema);
        assert!(matches!(collection.by_owner(1), Err(Error::NoOwnerField(c)) if c == "farms"));
    }

    #[test]
    fn remove_and_merge_where() {
        let mut collection = test_collection();
        collection.create(crop(1, "Corn"), now()).unwrap();
        collection.create(crop(2, "Rice"), now()).unwrap();
        collection.create(crop(1, "Wheat"), now()).unwrap();

        let notes = into_fields(json!({"notes": "checked"})).unwrap();
        let merged = collection
            .merge_where(|r| r.reference("farmId") == Some(2), &notes)
            .unwrap();
        assert_eq!(merged, 1);
        assert_eq!(collection.get(2).unwrap().get("notes"), Some(&json!("checked")));

        let removed = collection.remove_where(|r| r.reference("farmId") == Some(1));
        assert_eq!(removed, 2);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn merge_where_is_all_or_nothing() {
        let mut collection = test_collection();
        collection.create(crop(1, "Corn"), now()).unwrap();
        collection.create(crop(1, "Wheat"), now()).unwrap();

        let bad = into_fields(json!({"farmId": null})).unwrap();
        let result = collection.merge_where(|_| true, &bad);
        assert!(matches!(result, Err(Error::MissingRequiredField(_))));
        assert!(collection.records().iter().all(|r| r.reference("farmId") == Some(1)));
    }

    #[test]
    fn load_existing_records() {
        let mut collection = test_collection();
        collection
            .load(vec![
                json!({"Id": 4, "farmId": 1, "name": "Corn", "status": "planted"}),
                json!({"Id": 2, "farmId": 1, "name": "Rice", "status": "planted"}),
            ])
            .unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.next_id().unwrap(), 5);

        let duplicate = collection.load(vec![json!({"Id": 2, "farmId": 1, "name": "x", "status": "planted"})]);
        assert!(matches!(duplicate, Err(Error::DuplicateId { id: 2, .. })));

        let no_id = collection.load(vec![json!({"farmId": 1, "name": "x", "status": "planted"})]);
        assert!(matches!(no_id, Err(Error::InvalidSeed(_))));
    }

    #[test]
    fn seeded_ids_stay_in_range() {
        let mut collection = test_collection();
        let huge = collection.load(vec![
            json!({"Id": u64::MAX, "farmId": 1, "name": "Corn", "status": "planted"}),
        ]);
        assert!(matches!(huge, Err(Error::InvalidId(_))));
        assert!(collection.is_empty());

        collection
            .load(vec![json!({"Id": MAX_ID, "farmId": 1, "name": "Corn", "status": "planted"})])
            .unwrap();
        let exhausted = collection.create(crop(1, "Wheat"), now());
        assert!(matches!(exhausted, Err(Error::Fault(_))));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn rejected_conversion_stores_nothing() {
        let mut collection = test_collection();
        let refuse = |_: &Record| -> Result<()> { Err(Error::Fault("unreadable".into())) };

        let created = collection.create_as(crop(1, "Corn"), now(), refuse);
        assert!(matches!(created, Err(Error::Fault(_))));
        assert!(collection.is_empty());
        assert_eq!(collection.next_id().unwrap(), 1);

        let kept = collection.create(crop(1, "Corn"), now()).unwrap();
        let partial = into_fields(json!({"name": "Maize"})).unwrap();
        let updated = collection.update_as(kept.id, &partial, refuse);
        assert!(matches!(updated, Err(Error::Fault(_))));
        assert_eq!(collection.get(kept.id).unwrap(), &kept);
    }

    #[test]
    fn id_strategy_from_str() {
        assert_eq!("high-water".parse::<IdStrategy>().unwrap(), IdStrategy::HighWater);
        assert_eq!("MAX_EXISTING".parse::<IdStrategy>().unwrap(), IdStrategy::MaxExisting);
        assert!("random".parse::<IdStrategy>().is_err());
    }

    #[test]
    fn collection_serialization() {
        let mut collection = test_collection();
        collection.create(crop(1, "Corn"), now()).unwrap();

        let json = serde_json::to_string(&collection).unwrap();
        let restored: Collection = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.next_id().unwrap(), 2);
        assert_eq!(restored.name(), "crops");
    }
}

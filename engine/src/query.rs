//! Read-only queries over a collection's records.
//!
//! A [`Query`] is an owned description of filters, ordering and a limit. It
//! can be built once (for example from request parameters) and run against
//! any slice of records through a [`QueryBuilder`].

use crate::{record::Record, schema::parse_date, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// A single record predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Filter {
    /// Field equals a value exactly.
    Eq { field: String, value: Value },
    /// Date field within inclusive bounds. Records without a parseable date
    /// never match.
    DateRange {
        field: String,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// Case-insensitive substring match against any of the fields.
    Search { fields: Vec<String>, term: String },
}

impl Filter {
    /// Check whether a record satisfies this filter.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Eq { field, value } => record.get(field) == Some(value),
            Filter::DateRange { field, from, to } => {
                let Some(date) = record.get(field).and_then(Value::as_str).and_then(parse_date)
                else {
                    return false;
                };
                from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
            }
            Filter::Search { fields, term } => {
                let needle = term.trim().to_lowercase();
                if needle.is_empty() {
                    return true;
                }
                fields.iter().any(|f| {
                    record
                        .get(f)
                        .and_then(Value::as_str)
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

/// Ordering by one field; ties fall back to Id in the same direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

/// Filters, ordering and limit for a read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub filters: Vec<Filter>,
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Require the owner reference to equal `owner_id`.
    pub fn owned_by(self, field: impl Into<String>, owner_id: RecordId) -> Self {
        self.eq(field, owner_id)
    }

    /// Require a date field within inclusive bounds.
    pub fn date_range(
        mut self,
        field: impl Into<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        self.filters.push(Filter::DateRange {
            field: field.into(),
            from,
            to,
        });
        self
    }

    /// Case-insensitive substring search across `fields`.
    pub fn search(mut self, fields: &[&str], term: impl Into<String>) -> Self {
        self.filters.push(Filter::Search {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            term: term.into(),
        });
        self
    }

    /// Add an arbitrary filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            descending: false,
        });
        self
    }

    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check a record against every filter.
    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Run the query over a slice of records.
    pub fn run<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let mut hits: Vec<&Record> = records.iter().filter(|r| self.matches(r)).collect();

        if let Some(sort) = &self.sort {
            hits.sort_by(|a, b| {
                compare_values(a.get(&sort.field), b.get(&sort.field), sort.descending)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }

        if let Some(limit) = self.limit {
            hits.truncate(limit);
        }
        hits
    }
}

/// Missing and null values sort after everything else, in either direction.
fn compare_values(a: Option<&Value>, b: Option<&Value>, descending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = match (a, b) {
                (Value::Number(x), Value::Number(y)) => {
                    let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
                (Value::String(x), Value::String(y)) => x.cmp(y),
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                _ => a.to_string().cmp(&b.to_string()),
            };
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

/// Builder for querying records borrowed from a collection.
#[derive(Debug)]
pub struct QueryBuilder<'a> {
    records: &'a [Record],
    query: Query,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(records: &'a [Record]) -> Self {
        Self {
            records,
            query: Query::new(),
        }
    }

    /// Replace the accumulated query.
    pub fn apply(mut self, query: &Query) -> Self {
        self.query = query.clone();
        self
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.query = self.query.eq(field, value);
        self
    }

    pub fn owned_by(mut self, field: &str, owner_id: RecordId) -> Self {
        self.query = self.query.owned_by(field, owner_id);
        self
    }

    pub fn search(mut self, fields: &[&str], term: &str) -> Self {
        self.query = self.query.search(fields, term);
        self
    }

    /// Get all matching records.
    pub fn all(self) -> Vec<&'a Record> {
        self.query.run(self.records)
    }

    /// Get the first matching record.
    pub fn first(self) -> Option<&'a Record> {
        self.all().into_iter().next()
    }

    /// Count matching records.
    pub fn count(self) -> usize {
        self.records.iter().filter(|r| self.query.matches(r)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::into_fields;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            Record::new(1, into_fields(json!({"description": "Wheat harvest sale", "category": "crop_sale", "amount": 2500, "date": "2024-01-15", "farmId": 1})).unwrap()),
            Record::new(2, into_fields(json!({"description": "Corn seeds purchase", "category": "seeds", "amount": 450, "date": "2024-01-10", "farmId": 1})).unwrap()),
            Record::new(3, into_fields(json!({"description": "Vegetable harvest", "category": "crop_sale", "amount": 1800, "date": "2024-01-20", "farmId": 2})).unwrap()),
            Record::new(4, into_fields(json!({"description": "Organic fertilizer", "category": "fertilizer", "amount": 320, "date": "2024-02-12", "farmId": null})).unwrap()),
        ]
    }

    fn ids(hits: &[&Record]) -> Vec<RecordId> {
        hits.iter().map(|r| r.id).collect()
    }

    #[test]
    fn eq_and_owner() {
        let records = records();
        let hits = Query::new().eq("category", "crop_sale").run(&records);
        assert_eq!(ids(&hits), vec![1, 3]);

        let hits = Query::new().owned_by("farmId", 1).run(&records);
        assert_eq!(ids(&hits), vec![1, 2]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let records = records();
        let hits = Query::new()
            .search(&["description", "category"], "HARVEST")
            .run(&records);
        assert_eq!(ids(&hits), vec![1, 3]);

        let hits = Query::new().search(&["description"], "  ").run(&records);
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn date_range_is_inclusive() {
        let records = records();
        let from = NaiveDate::from_ymd_opt(2024, 1, 10);
        let to = NaiveDate::from_ymd_opt(2024, 1, 15);
        let hits = Query::new().date_range("date", from, to).run(&records);
        assert_eq!(ids(&hits), vec![1, 2]);

        let hits = Query::new().date_range("date", None, None).run(&records);
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn sort_and_limit() {
        let records = records();
        let hits = Query::new().sort_desc("date").limit(2).run(&records);
        assert_eq!(ids(&hits), vec![4, 3]);

        let hits = Query::new().sort_asc("amount").run(&records);
        assert_eq!(ids(&hits), vec![4, 2, 3, 1]);
    }

    #[test]
    fn nulls_sort_last() {
        let records = records();
        let hits = Query::new().sort_asc("farmId").run(&records);
        assert_eq!(ids(&hits), vec![1, 2, 3, 4]);

        let hits = Query::new().sort_desc("farmId").run(&records);
        assert_eq!(ids(&hits), vec![3, 1, 2, 4]);
    }

    #[test]
    fn builder_over_slice() {
        let records = records();
        assert_eq!(QueryBuilder::new(&records).eq("farmId", 2).count(), 1);
        assert_eq!(
            QueryBuilder::new(&records)
                .search(&["description"], "corn")
                .first()
                .map(|r| r.id),
            Some(2)
        );

        let query = Query::new().sort_desc("amount");
        let hits = QueryBuilder::new(&records).apply(&query).all();
        assert_eq!(hits[0].id, 1);
    }
}

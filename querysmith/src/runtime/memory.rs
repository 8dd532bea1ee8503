//! In-memory [`CrudBackend`]

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::{CrudBackend, Filter, Record, SelectQuery};
use crate::error::RuntimeError;
use crate::query::Direction;

#[derive(Debug, Default)]
struct Rows {
    records: Vec<Record>,
    next_id: i64,
}

/// Rows held in memory, keyed by table name
///
/// Inserted records without an `id` get the next free integer one.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Rows>>,
}

impl MemoryBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored for `table`
    #[must_use]
    pub fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .get(table)
            .map_or(0, |rows| rows.records.len())
    }

    /// Whether `table` holds no rows
    #[must_use]
    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }
}

fn matches(record: &Record, filter: &Filter) -> bool {
    record
        .get(&filter.column)
        .is_some_and(|value| loosely_equal(value, &filter.value))
}

/// Equal values, or numbers equal after widening, or a number and its text
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.trim().parse::<f64>().ok() == n.as_f64()
        }
        _ => a == b,
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl CrudBackend for MemoryBackend {
    async fn insert(&self, table: &str, mut values: Record) -> Result<Record, RuntimeError> {
        let mut tables = self.tables.write();
        let rows = tables.entry(table.to_string()).or_default();

        match values.get("id").map(Value::as_i64) {
            Some(Some(id)) => rows.next_id = rows.next_id.max(id),
            Some(None) => {}
            None => {
                rows.next_id = rows
                    .next_id
                    .checked_add(1)
                    .ok_or_else(|| RuntimeError::Backend("id space exhausted".to_string()))?;
                values.insert("id".to_string(), Value::from(rows.next_id));
            }
        }

        rows.records.push(values.clone());
        Ok(values)
    }

    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Record>, RuntimeError> {
        let tables = self.tables.read();
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<Record> = rows
            .records
            .iter()
            .filter(|record| query.filter.as_ref().is_none_or(|f| matches(record, f)))
            .cloned()
            .collect();

        let column = query.sort.column.as_str();
        found.sort_by(|a, b| {
            let ordering = compare(a.get(column), b.get(column));
            match query.sort.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });

        if let Some(limit) = query.limit {
            found.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(found)
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        values: Record,
    ) -> Result<Vec<Record>, RuntimeError> {
        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for record in rows.records.iter_mut().filter(|r| matches(r, filter)) {
            record.extend(values.clone());
            updated.push(record.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<Vec<Record>, RuntimeError> {
        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let (removed, kept): (Vec<Record>, Vec<Record>) = std::mem::take(&mut rows.records)
            .into_iter()
            .partition(|record| matches(record, filter));
        rows.records = kept;
        Ok(removed)
    }
}

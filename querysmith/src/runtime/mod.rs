//! CRUD abstraction runtime
//!
//! The fluent builder that generated code is written against:
//!
//! - `create()` then `run(values)` inserts one record
//! - `get(quantity)` then any of `filter` / `order_by` / `limit`, then `run()`
//! - `update()` then `filter` and `set`, then `run()`
//! - `destroy()` then `filter`, then `run()`
//!
//! `update` and `destroy` refuse to run without a filter and return
//! [`RuntimeError::MissingWhereClause`] before the backend is touched.
//!
//! Storage sits behind the [`CrudBackend`] trait; [`MemoryBackend`] keeps
//! rows in memory.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use querysmith::runtime::{CrudAbstractions, MemoryBackend, Fetched};
//! use querysmith::query::Quantity;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), querysmith::error::RuntimeError> {
//! let users = CrudAbstractions::new("users", Arc::new(MemoryBackend::new()));
//!
//! users.create().run(json!({ "email": "a@b.c" }).as_object().cloned().unwrap_or_default()).await?;
//!
//! let found = users.get(Quantity::One).filter("email", "a@b.c").run().await?;
//! assert!(matches!(found, Fetched::One(Some(_))));
//!
//! // update without a filter is rejected
//! assert!(users.update().run().await.is_err());
//! # Ok(())
//! # }
//! ```

mod memory;

pub use memory::MemoryBackend;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::RuntimeError;
use crate::query::{Direction, Quantity};

/// One stored row
pub type Record = serde_json::Map<String, Value>;

/// Equality filter on one column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column name
    pub column: String,
    /// Value the column must equal
    pub value: Value,
}

/// Sort applied to a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Column name
    pub column: String,
    /// Sort direction
    pub direction: Direction,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            column: "id".to_string(),
            direction: Direction::Asc,
        }
    }
}

/// Fully assembled read
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    /// Optional filter
    pub filter: Option<Filter>,
    /// Sort, `id` ascending unless overridden
    pub sort: Sort,
    /// Maximum number of rows
    pub limit: Option<u32>,
}

/// Storage behind [`CrudAbstractions`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CrudBackend: Send + Sync {
    /// Insert one record and return it as stored
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Backend` if the record cannot be stored
    async fn insert(&self, table: &str, values: Record) -> Result<Record, RuntimeError>;

    /// Return matching records in query order
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Backend` if the read fails
    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Record>, RuntimeError>;

    /// Apply `values` to matching records and return them
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Backend` if the write fails
    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        values: Record,
    ) -> Result<Vec<Record>, RuntimeError>;

    /// Remove matching records and return them
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Backend` if the delete fails
    async fn delete(&self, table: &str, filter: &Filter) -> Result<Vec<Record>, RuntimeError>;
}

/// Result of a read
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// `get(One)`: the first matching record, if any
    One(Option<Record>),
    /// `get(All)`: every matching record
    All(Vec<Record>),
}

impl Fetched {
    /// Flatten into a list
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::One(record) => record.into_iter().collect(),
            Self::All(records) => records,
        }
    }
}

/// CRUD entry point bound to one table
#[derive(Clone)]
pub struct CrudAbstractions {
    table: String,
    backend: Arc<dyn CrudBackend>,
}

impl fmt::Debug for CrudAbstractions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudAbstractions")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl CrudAbstractions {
    /// Bind the runtime to a table
    pub fn new(table: impl Into<String>, backend: Arc<dyn CrudBackend>) -> Self {
        Self {
            table: table.into(),
            backend,
        }
    }

    /// Table name
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Start an insert
    #[must_use]
    pub const fn create(&self) -> CreateBuilder<'_> {
        CreateBuilder { crud: self }
    }

    /// Start a read
    #[must_use]
    pub const fn get(&self, quantity: Quantity) -> GetBuilder<'_> {
        GetBuilder {
            crud: self,
            quantity,
            filter: None,
            sort: None,
            limit: None,
        }
    }

    /// Start an update
    #[must_use]
    pub fn update(&self) -> UpdateBuilder<'_> {
        UpdateBuilder {
            crud: self,
            filter: None,
            values: Record::new(),
        }
    }

    /// Start a delete
    #[must_use]
    pub const fn destroy(&self) -> DestroyBuilder<'_> {
        DestroyBuilder {
            crud: self,
            filter: None,
        }
    }
}

fn equals(column: impl Into<String>, value: impl Into<Value>) -> Filter {
    Filter {
        column: column.into(),
        value: value.into(),
    }
}

/// Pending insert
#[derive(Debug)]
#[must_use = "builders do nothing until `run` is awaited"]
pub struct CreateBuilder<'a> {
    crud: &'a CrudAbstractions,
}

impl CreateBuilder<'_> {
    /// Insert `values`
    ///
    /// # Errors
    ///
    /// Propagates backend failures
    pub async fn run(self, values: Record) -> Result<Record, RuntimeError> {
        tracing::debug!(table = %self.crud.table, "create");
        self.crud.backend.insert(&self.crud.table, values).await
    }
}

/// Pending read
#[derive(Debug)]
#[must_use = "builders do nothing until `run` is awaited"]
pub struct GetBuilder<'a> {
    crud: &'a CrudAbstractions,
    quantity: Quantity,
    filter: Option<Filter>,
    sort: Option<Sort>,
    limit: Option<u32>,
}

impl GetBuilder<'_> {
    /// Keep records whose `column` equals `value`; a later call replaces it
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(equals(column, value));
        self
    }

    /// Sort by `column`
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.sort = Some(Sort {
            column: column.into(),
            direction,
        });
        self
    }

    /// Return at most `n` records; zero means no limit
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = (n > 0).then_some(n);
        self
    }

    /// Execute the read
    ///
    /// # Errors
    ///
    /// Propagates backend failures
    pub async fn run(self) -> Result<Fetched, RuntimeError> {
        let limit = match self.quantity {
            Quantity::One => Some(1),
            Quantity::All => self.limit,
        };
        let query = SelectQuery {
            filter: self.filter,
            sort: self.sort.unwrap_or_default(),
            limit,
        };

        tracing::debug!(table = %self.crud.table, quantity = %self.quantity, "get");
        let records = self.crud.backend.select(&self.crud.table, &query).await?;

        Ok(match self.quantity {
            Quantity::One => Fetched::One(records.into_iter().next()),
            Quantity::All => Fetched::All(records),
        })
    }
}

/// Pending update
#[derive(Debug)]
#[must_use = "builders do nothing until `run` is awaited"]
pub struct UpdateBuilder<'a> {
    crud: &'a CrudAbstractions,
    filter: Option<Filter>,
    values: Record,
}

impl UpdateBuilder<'_> {
    /// Restrict the update to records whose `column` equals `value`
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(equals(column, value));
        self
    }

    /// Values to write; repeated calls merge
    pub fn set(mut self, values: Record) -> Self {
        self.values.extend(values);
        self
    }

    /// Execute the update
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::MissingWhereClause` if no filter was given,
    /// otherwise propagates backend failures
    pub async fn run(self) -> Result<Vec<Record>, RuntimeError> {
        let Some(filter) = self.filter else {
            tracing::warn!(table = %self.crud.table, "update refused without a Where clause");
            return Err(RuntimeError::MissingWhereClause {
                operation: "Update",
            });
        };

        tracing::debug!(table = %self.crud.table, column = %filter.column, "update");
        self.crud
            .backend
            .update(&self.crud.table, &filter, self.values)
            .await
    }
}

/// Pending delete
#[derive(Debug)]
#[must_use = "builders do nothing until `run` is awaited"]
pub struct DestroyBuilder<'a> {
    crud: &'a CrudAbstractions,
    filter: Option<Filter>,
}

impl DestroyBuilder<'_> {
    /// Restrict the delete to records whose `column` equals `value`
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(equals(column, value));
        self
    }

    /// Execute the delete
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::MissingWhereClause` if no filter was given,
    /// otherwise propagates backend failures
    pub async fn run(self) -> Result<Vec<Record>, RuntimeError> {
        let Some(filter) = self.filter else {
            tracing::warn!(table = %self.crud.table, "delete refused without a Where clause");
            return Err(RuntimeError::MissingWhereClause {
                operation: "Delete",
            });
        };

        tracing::debug!(table = %self.crud.table, column = %filter.column, "destroy");
        self.crud.backend.delete(&self.crud.table, &filter).await
    }
}

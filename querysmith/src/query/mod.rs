//! Query configuration model
//!
//! A [`QueryConfiguration`] is one CRUD intent against a selected table. It
//! refers to its table by name and is edited one control at a time through
//! the `set_*` mutators. All values are kept as the literal text the user
//! typed; interpretation happens at generation time.
//!
//! The JSON form uses camelCase keys:
//!
//! ```json
//! {
//!   "table": "users",
//!   "operation": "update",
//!   "whereClause": { "column": "id", "value": "7" },
//!   "updateData": { "email": "a@b.c" }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::schema::Table;

/// CRUD operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Insert one record
    Create,
    /// Read records
    #[default]
    #[serde(alias = "read")]
    Get,
    /// Update matching records
    Update,
    /// Delete matching records
    #[serde(alias = "delete")]
    Destroy,
}

impl Operation {
    /// All operations in display order
    pub const ALL: [Self; 4] = [Self::Create, Self::Get, Self::Update, Self::Destroy];

    /// Lowercase token used in function names and file names
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }

    /// Capitalised token used in titles and handler names
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Get => "Get",
            Self::Update => "Update",
            Self::Destroy => "Destroy",
        }
    }

    /// Whether the operation filters records with a Where clause
    #[must_use]
    pub const fn uses_where(self) -> bool {
        !matches!(self, Self::Create)
    }

    /// Whether running the operation requires a Where clause
    #[must_use]
    pub const fn requires_where(self) -> bool {
        matches!(self, Self::Update | Self::Destroy)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "get" | "read" => Ok(Self::Get),
            "update" => Ok(Self::Update),
            "destroy" | "delete" => Ok(Self::Destroy),
            other => Err(format!("Unknown operation: {other}")),
        }
    }
}

/// Number of records a read returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Quantity {
    /// A single record (or none)
    One,
    /// Every matching record
    #[default]
    All,
}

impl Quantity {
    /// Token passed to `get(...)`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::One => "One",
            Self::All => "All",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl Direction {
    /// Token passed to `Order(...)`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "Asc",
            Self::Desc => "Desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Unknown direction: {other}")),
        }
    }
}

/// `(column, literal)` filter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WhereClause {
    /// Column name
    #[serde(default)]
    pub column: String,
    /// Literal text as typed
    #[serde(default)]
    pub value: String,
}

/// `(column, direction)` sort
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderBy {
    /// Column name
    #[serde(default)]
    pub column: String,
    /// Sort direction
    #[serde(default)]
    pub direction: Direction,
}

/// One CRUD intent against a table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryConfiguration {
    /// Name of the target table
    pub table: String,
    /// Operation to generate
    pub operation: Operation,
    /// Read quantity
    pub quantity: Quantity,
    /// Filter for Read / Update / Delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereClause>,
    /// Sort for Read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    /// Row limit for Read; zero is treated as unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Field values for Create
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub create_data: IndexMap<String, String>,
    /// Field values for Update
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub update_data: IndexMap<String, String>,
}

impl QueryConfiguration {
    /// Fresh Read/All configuration for a table
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Builder-style operation setter
    #[must_use]
    pub const fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Builder-style Where setter
    #[must_use]
    pub fn with_where(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_where_clause(column, value);
        self
    }

    /// Select the operation
    pub fn set_operation(&mut self, operation: Operation) {
        self.operation = operation;
    }

    /// Select the read quantity
    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    /// Replace the Where clause
    pub fn set_where_clause(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.where_clause = Some(WhereClause {
            column: column.into(),
            value: value.into(),
        });
    }

    /// Remove the Where clause
    pub fn clear_where_clause(&mut self) {
        self.where_clause = None;
    }

    /// Replace the sort
    pub fn set_order_by(&mut self, column: impl Into<String>, direction: Direction) {
        self.order_by = Some(OrderBy {
            column: column.into(),
            direction,
        });
    }

    /// Set or clear the row limit; zero clears it
    pub fn set_limit(&mut self, limit: Option<u32>) {
        self.limit = limit.filter(|n| *n > 0);
    }

    /// Set one Create field value
    pub fn set_create_value(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.create_data.insert(field.into(), value.into());
    }

    /// Set one Update field value
    pub fn set_update_value(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.update_data.insert(field.into(), value.into());
    }

    /// Whether no table is referenced
    #[must_use]
    pub fn is_unselected(&self) -> bool {
        self.table.trim().is_empty()
    }

    /// Configured Where column, if non-blank
    #[must_use]
    pub fn where_column(&self) -> Option<&str> {
        self.where_clause
            .as_ref()
            .map(|w| w.column.trim())
            .filter(|c| !c.is_empty())
    }

    /// Configured Where value, if non-blank
    #[must_use]
    pub fn where_value(&self) -> Option<&str> {
        self.where_clause
            .as_ref()
            .map(|w| w.value.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// Configured sort, if the column is non-blank
    #[must_use]
    pub fn order(&self) -> Option<(&str, Direction)> {
        self.order_by
            .as_ref()
            .map(|o| (o.column.trim(), o.direction))
            .filter(|(column, _)| !column.is_empty())
    }

    /// Row limit, if positive
    #[must_use]
    pub fn effective_limit(&self) -> Option<u32> {
        self.limit.filter(|n| *n > 0)
    }

    /// Data entries written by the current operation
    #[must_use]
    pub fn payload(&self) -> Option<&IndexMap<String, String>> {
        match self.operation {
            Operation::Create => Some(&self.create_data),
            Operation::Update => Some(&self.update_data),
            Operation::Get | Operation::Destroy => None,
        }
    }
}

/// Role a column plays in a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    /// Where clause column
    Where,
    /// Order clause column
    Order,
    /// Create/Update data key
    Payload,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Where => "Where",
            Self::Order => "Order",
            Self::Payload => "data",
        })
    }
}

/// A problem found by [`check_query`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QueryIssue {
    /// Update/Delete configured without a Where column
    MissingWhereClause {
        /// Offending operation
        operation: Operation,
    },
    /// A referenced column is not a field of the table
    UnknownColumn {
        /// Column name
        column: String,
        /// Where the column was referenced
        role: ColumnRole,
    },
    /// Create/Update data writes a primary key field
    PrimaryKeyInPayload {
        /// Field name
        field: String,
    },
}

impl fmt::Display for QueryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingWhereClause { operation } => write!(
                f,
                "{} has no Where column; generated code falls back to \"id\"",
                operation.label()
            ),
            Self::UnknownColumn { column, role } => {
                write!(f, "{role} column '{column}' is not a field of the table")
            }
            Self::PrimaryKeyInPayload { field } => {
                write!(f, "Primary key '{field}' is written by the payload")
            }
        }
    }
}

/// Check a configuration against the table it targets
///
/// Only columns the selected operation actually uses are checked, and
/// payload entries with blank values are ignored since generation omits
/// them.
#[must_use]
pub fn check_query(table: &Table, config: &QueryConfiguration) -> Vec<QueryIssue> {
    let mut issues = Vec::new();
    let operation = config.operation;

    if operation.requires_where() && config.where_column().is_none() {
        issues.push(QueryIssue::MissingWhereClause { operation });
    }

    let mut check_column = |column: &str, role: ColumnRole| {
        if table.field(column).is_none() {
            issues.push(QueryIssue::UnknownColumn {
                column: column.to_string(),
                role,
            });
        }
    };

    if operation.uses_where() {
        if let Some(column) = config.where_column() {
            check_column(column, ColumnRole::Where);
        }
    }

    if operation == Operation::Get {
        if let Some((column, _)) = config.order() {
            check_column(column, ColumnRole::Order);
        }
    }

    if let Some(payload) = config.payload() {
        for (key, value) in payload {
            if value.trim().is_empty() {
                continue;
            }
            match table.field(key) {
                None => issues.push(QueryIssue::UnknownColumn {
                    column: key.clone(),
                    role: ColumnRole::Payload,
                }),
                Some(field) if field.constraints.is_primary => {
                    issues.push(QueryIssue::PrimaryKeyInPayload { field: key.clone() });
                }
                Some(_) => {}
            }
        }
    }

    issues
}

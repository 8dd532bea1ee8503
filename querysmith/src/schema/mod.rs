//! Table and field model for parsed schema declarations
//!
//! A [`Table`] is the structural model of one `export const X = pgTable(...)`
//! declaration; its [`Field`]s keep the order in which they first appear in
//! the source text.
//!
//! # Type vocabulary
//!
//! - `text`, `varchar`, `serial`, `int`, `timestamp`, `boolean`, `bigint`,
//!   `decimal`, `date`, `json`, `uuid`, `real`, `blob`
//! - any other `identifier(` call, recorded as an enum-style custom type
//!
//! Definitions that match none of these fall back to `text`.

pub mod draft;
pub mod parser;
pub mod validate;

pub use draft::{Dialect, DraftColumn, DraftTable, SchemaDraft};
pub use parser::{parse_schema, SchemaParser};
pub use validate::{validate_tables, SchemaIssue, Severity};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed table declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Exported identifier (e.g., `users`)
    pub name: String,
    /// Name passed to the table factory (e.g., `"users"`)
    #[serde(default)]
    pub db_name: String,
    /// Columns in source order
    pub fields: Vec<Field>,
}

impl Table {
    /// Create an empty table
    pub fn new(name: impl Into<String>, db_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_name: db_name.into(),
            fields: Vec::new(),
        }
    }

    /// Find the first field with the given name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that are not part of the primary key
    pub fn payload_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.constraints.is_primary)
    }

    /// Whether any field carries `.primaryKey(`
    #[must_use]
    pub fn has_primary_key(&self) -> bool {
        self.fields.iter().any(|f| f.constraints.is_primary)
    }
}

/// A single column within a [`Table`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column identifier as written before the first `:`
    pub name: String,
    /// Inferred column type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Constraint flags
    pub constraints: Constraints,
    /// `length: N` option, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// `precision: N` option, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl Field {
    /// Create a field with no constraints
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            constraints: Constraints::default(),
            length: None,
            precision: None,
        }
    }

    /// Mark as primary key
    #[must_use]
    pub const fn primary(mut self) -> Self {
        self.constraints.is_primary = true;
        self
    }

    /// Mark as not null
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.constraints.is_not_null = true;
        self
    }

    /// Mark as unique
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.constraints.is_unique = true;
        self
    }
}

/// Constraint flags inferred from modifier calls
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// `.primaryKey(` present
    pub is_primary: bool,
    /// `.unique(` present
    pub is_unique: bool,
    /// `.notNull(` present
    pub is_not_null: bool,
}

/// Column type vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum FieldType {
    /// Unbounded text (also the fallback)
    #[default]
    Text,
    /// Bounded character string
    Varchar,
    /// Auto-incrementing integer
    Serial,
    /// 32-bit integer
    Int,
    /// Timestamp
    Timestamp,
    /// Boolean
    Boolean,
    /// 64-bit integer
    BigInt,
    /// Fixed-point decimal
    Decimal,
    /// Calendar date
    Date,
    /// JSON document
    Json,
    /// UUID
    Uuid,
    /// Floating point
    Real,
    /// Binary data
    Blob,
    /// Custom call such as a `pgEnum` column (`statusEnum("status")`)
    Enum(String),
}

impl FieldType {
    /// The declared type token
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Varchar => "varchar",
            Self::Serial => "serial",
            Self::Int => "int",
            Self::Timestamp => "timestamp",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Json => "json",
            Self::Uuid => "uuid",
            Self::Real => "real",
            Self::Blob => "blob",
            Self::Enum(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.token().to_string()
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => Self::Text,
            "varchar" => Self::Varchar,
            "serial" => Self::Serial,
            "int" => Self::Int,
            "timestamp" => Self::Timestamp,
            "boolean" => Self::Boolean,
            "bigint" => Self::BigInt,
            "decimal" => Self::Decimal,
            "date" => Self::Date,
            "json" => Self::Json,
            "uuid" => Self::Uuid,
            "real" => Self::Real,
            "blob" => Self::Blob,
            _ => Self::Enum(value),
        }
    }
}

/// Sample schema with three related tables
pub const DEMO_SCHEMA: &str = r#"import { pgTable } from "drizzle-orm/pg-core";
import * as t from "drizzle-orm/pg-core";

export const users = pgTable("users", {
  id: t.int().primaryKey(),
  firstName: t.text("first_name").notNull(),
  lastName: t.text("last_name").notNull(),
  email: t.text().notNull().unique(),
  age: t.int(),
  isActive: t.boolean("is_active").default(true),
  createdAt: t.timestamp("created_at").defaultNow(),
  updatedAt: t.timestamp("updated_at").defaultNow()
});

export const posts = pgTable("posts", {
  id: t.int().primaryKey(),
  title: t.text().notNull(),
  content: t.text(),
  slug: t.text().unique(),
  authorId: t.int("author_id").notNull().references(() => users.id),
  published: t.boolean().default(false),
  createdAt: t.timestamp("created_at").defaultNow()
});

export const comments = pgTable("comments", {
  id: t.int().primaryKey(),
  text: t.text({ length: 256 }),
  postId: t.int("post_id").references(() => posts.id),
  authorId: t.int("author_id").references(() => users.id),
  createdAt: t.timestamp("created_at").defaultNow()
});
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_tokens_round_trip() {
        let types = [
            FieldType::Text,
            FieldType::Varchar,
            FieldType::Serial,
            FieldType::Int,
            FieldType::Timestamp,
            FieldType::Boolean,
            FieldType::BigInt,
            FieldType::Decimal,
            FieldType::Date,
            FieldType::Json,
            FieldType::Uuid,
            FieldType::Real,
            FieldType::Blob,
            FieldType::Enum("moodEnum".to_string()),
        ];

        for ty in types {
            let token = ty.to_string();
            assert_eq!(FieldType::from(token), ty);
        }
    }

    #[test]
    fn test_table_helpers() {
        let mut table = Table::new("users", "users");
        table.fields.push(Field::new("id", FieldType::Int).primary());
        table.fields.push(Field::new("email", FieldType::Text).not_null().unique());

        assert!(table.has_primary_key());
        assert_eq!(table.field("email").map(|f| f.constraints.is_unique), Some(true));
        assert!(table.field("missing").is_none());

        let payload: Vec<_> = table.payload_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(payload, vec!["email"]);
    }

    #[test]
    fn test_field_serializes_type_token() {
        let field = Field::new("isActive", FieldType::Boolean).not_null();
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "boolean");
        assert_eq!(json["constraints"]["isNotNull"], true);
        assert!(json.get("length").is_none());
    }
}

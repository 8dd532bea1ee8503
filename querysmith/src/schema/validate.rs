//! Structural checks over already-parsed tables
//!
//! The parser accepts duplicates and tables without a primary key; this pass
//! reports them without changing the parsed model.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::{FieldType, Table};

/// How serious a [`SchemaIssue`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Generated code is likely to be wrong
    Warning,
    /// The schema is ambiguous
    Error,
}

/// A problem found by [`validate_tables`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SchemaIssue {
    /// Two tables share an exported name
    DuplicateTable {
        /// Table name
        table: String,
    },
    /// A table declares the same field twice
    DuplicateField {
        /// Table name
        table: String,
        /// Field name
        field: String,
    },
    /// No field carries `.primaryKey(`
    MissingPrimaryKey {
        /// Table name
        table: String,
    },
    /// A `varchar` column without a `length` option
    MissingLength {
        /// Table name
        table: String,
        /// Field name
        field: String,
    },
    /// A `decimal` column without a `precision` option
    MissingPrecision {
        /// Table name
        table: String,
        /// Field name
        field: String,
    },
}

impl SchemaIssue {
    /// Severity of this issue
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::DuplicateTable { .. } | Self::DuplicateField { .. } => Severity::Error,
            Self::MissingPrimaryKey { .. }
            | Self::MissingLength { .. }
            | Self::MissingPrecision { .. } => Severity::Warning,
        }
    }

    /// Table the issue belongs to
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::DuplicateTable { table }
            | Self::DuplicateField { table, .. }
            | Self::MissingPrimaryKey { table }
            | Self::MissingLength { table, .. }
            | Self::MissingPrecision { table, .. } => table,
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTable { table } => {
                write!(f, "Table '{table}' is declared more than once")
            }
            Self::DuplicateField { table, field } => {
                write!(f, "Field '{field}' is declared more than once in table '{table}'")
            }
            Self::MissingPrimaryKey { table } => {
                write!(f, "Table '{table}' has no primary key")
            }
            Self::MissingLength { table, field } => {
                write!(f, "varchar field '{table}.{field}' has no length")
            }
            Self::MissingPrecision { table, field } => {
                write!(f, "decimal field '{table}.{field}' has no precision")
            }
        }
    }
}

/// Check parsed tables for structural problems
///
/// Issues are reported per table in declaration order; a name repeated more
/// than twice is still reported once.
#[must_use]
pub fn validate_tables(tables: &[Table]) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    let mut seen_tables = HashSet::new();
    let mut reported_tables = HashSet::new();

    for table in tables {
        if !seen_tables.insert(table.name.as_str()) {
            if reported_tables.insert(table.name.as_str()) {
                issues.push(SchemaIssue::DuplicateTable {
                    table: table.name.clone(),
                });
            }
            continue;
        }

        let mut seen_fields = HashSet::new();
        let mut reported_fields = HashSet::new();
        for field in &table.fields {
            if !seen_fields.insert(field.name.as_str())
                && reported_fields.insert(field.name.as_str())
            {
                issues.push(SchemaIssue::DuplicateField {
                    table: table.name.clone(),
                    field: field.name.clone(),
                });
            }

            match field.field_type {
                FieldType::Varchar if field.length.is_none() => {
                    issues.push(SchemaIssue::MissingLength {
                        table: table.name.clone(),
                        field: field.name.clone(),
                    });
                }
                FieldType::Decimal if field.precision.is_none() => {
                    issues.push(SchemaIssue::MissingPrecision {
                        table: table.name.clone(),
                        field: field.name.clone(),
                    });
                }
                _ => {}
            }
        }

        if !table.has_primary_key() {
            issues.push(SchemaIssue::MissingPrimaryKey {
                table: table.name.clone(),
            });
        }
    }

    if !issues.is_empty() {
        tracing::debug!(issues = issues.len(), "Schema validation found issues");
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{parse_schema, Field, DEMO_SCHEMA};

    #[test]
    fn test_demo_schema_is_clean() {
        let tables = parse_schema(DEMO_SCHEMA);
        assert!(validate_tables(&tables).is_empty());
    }

    #[test]
    fn test_duplicates_reported_once() {
        let mut users = Table::new("users", "users");
        users.fields.push(Field::new("id", FieldType::Int).primary());
        users.fields.push(Field::new("name", FieldType::Text));
        users.fields.push(Field::new("name", FieldType::Text));
        users.fields.push(Field::new("name", FieldType::Int));

        let tables = vec![users.clone(), users.clone(), users];
        let issues = validate_tables(&tables);

        assert_eq!(
            issues,
            vec![
                SchemaIssue::DuplicateField {
                    table: "users".to_string(),
                    field: "name".to_string(),
                },
                SchemaIssue::DuplicateTable {
                    table: "users".to_string(),
                },
            ]
        );
        assert!(issues.iter().all(|i| i.severity() == Severity::Error));
    }

    #[test]
    fn test_missing_options_and_primary_key() {
        let source = r#"
export const prices = pgTable("prices", {
  label: t.varchar("label"),
  code: t.varchar("code", { length: 8 }),
  amount: t.decimal("amount"),
  rate: t.decimal("rate", { precision: 10, scale: 2 })
});
"#;
        let issues = validate_tables(&parse_schema(source));

        assert_eq!(issues.len(), 3);
        assert!(issues.contains(&SchemaIssue::MissingLength {
            table: "prices".to_string(),
            field: "label".to_string(),
        }));
        assert!(issues.contains(&SchemaIssue::MissingPrecision {
            table: "prices".to_string(),
            field: "amount".to_string(),
        }));
        assert!(issues.contains(&SchemaIssue::MissingPrimaryKey {
            table: "prices".to_string(),
        }));
        assert!(issues.iter().all(|i| i.severity() == Severity::Warning));
        assert!(issues.iter().all(|i| i.table() == "prices"));
    }

    #[test]
    fn test_display() {
        let issue = SchemaIssue::MissingLength {
            table: "users".to_string(),
            field: "email".to_string(),
        };
        assert_eq!(issue.to_string(), "varchar field 'users.email' has no length");

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "missingLength");
        assert_eq!(json["field"], "email");
    }
}

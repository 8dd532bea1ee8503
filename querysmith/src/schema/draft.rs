//! Schema draft builder
//!
//! A [`SchemaDraft`] is the structured form a user edits column by column;
//! [`SchemaDraft::render`] turns it into declaration text that the schema
//! parser reads back.
//!
//! # Examples
//!
//! ```
//! use querysmith::schema::{parse_schema, Dialect, DraftColumn, DraftTable, SchemaDraft};
//!
//! let mut draft = SchemaDraft::new(Dialect::Postgresql);
//! let mut users = DraftTable::new("users");
//! users.columns.push(DraftColumn::new("email", "varchar").with_length(255).not_null());
//! draft.tables.push(users);
//!
//! let text = draft.render();
//! assert!(text.contains(r#"email: t.varchar("email", { length: 255 }).notNull()"#));
//! assert_eq!(parse_schema(&text)[0].fields.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target database dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `drizzle-orm/pg-core`
    #[default]
    Postgresql,
    /// `drizzle-orm/mysql-core`
    Mysql,
    /// `drizzle-orm/sqlite-core`
    Sqlite,
    /// `drizzle-orm/sqlite-core` (libSQL)
    Turso,
}

impl Dialect {
    /// Dialect name as used in draft files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Turso => "turso",
        }
    }

    /// Import lines heading the rendered schema
    #[must_use]
    pub const fn imports(self) -> &'static [&'static str] {
        match self {
            Self::Postgresql => &[
                r#"import { pgTable } from "drizzle-orm/pg-core";"#,
                r#"import * as t from "drizzle-orm/pg-core";"#,
            ],
            Self::Mysql => &[
                r#"import { mysqlTable } from "drizzle-orm/mysql-core";"#,
                r#"import * as t from "drizzle-orm/mysql-core";"#,
            ],
            Self::Sqlite | Self::Turso => &[
                r#"import { sqliteTable as table } from "drizzle-orm/sqlite-core";"#,
                r#"import * as t from "drizzle-orm/sqlite-core";"#,
                r#"import { AnySQLiteColumn } from "drizzle-orm/sqlite-core";"#,
            ],
        }
    }

    /// Table factory called in each declaration
    #[must_use]
    pub const fn factory(self) -> &'static str {
        match self {
            Self::Postgresql => "pgTable",
            Self::Mysql => "mysqlTable",
            Self::Sqlite | Self::Turso => "table",
        }
    }

    /// Column types offered for this dialect, default first
    #[must_use]
    pub const fn column_types(self) -> &'static [&'static str] {
        match self {
            Self::Postgresql => &[
                "varchar", "text", "int", "bigint", "boolean", "timestamp", "date", "decimal",
                "json", "jsonb", "uuid",
            ],
            Self::Mysql => &[
                "varchar", "text", "int", "bigint", "boolean", "timestamp", "date", "decimal",
                "json",
            ],
            Self::Sqlite | Self::Turso => &["text", "int", "real", "blob"],
        }
    }

    /// Type given to a freshly added column
    #[must_use]
    pub const fn default_column_type(self) -> &'static str {
        self.column_types()[0]
    }

    const fn is_sqlite_family(self) -> bool {
        matches!(self, Self::Sqlite | Self::Turso)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Self::Postgresql),
            "mysql" => Ok(Self::Mysql),
            "sqlite" => Ok(Self::Sqlite),
            "turso" => Ok(Self::Turso),
            other => Err(format!("Unknown dialect: {other}")),
        }
    }
}

/// One column being drafted
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftColumn {
    /// Column name; blank columns are skipped when rendering
    pub name: String,
    /// Column type token
    #[serde(rename = "type")]
    pub column_type: String,
    /// Length option (rendered for `varchar` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// `.notNull()`
    #[serde(default)]
    pub not_null: bool,
    /// `.primaryKey()`
    #[serde(default)]
    pub primary_key: bool,
    /// `.unique()`
    #[serde(default)]
    pub unique: bool,
    /// Auto-increment on the primary key
    #[serde(default)]
    pub auto_increment: bool,
    /// `.default(...)` expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl DraftColumn {
    /// Create a plain column
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            length: None,
            not_null: false,
            primary_key: false,
            unique: false,
            auto_increment: false,
            default_value: None,
        }
    }

    /// The `id` column every new table starts with
    #[must_use]
    pub fn id() -> Self {
        Self {
            not_null: true,
            primary_key: true,
            auto_increment: true,
            ..Self::new("id", "int")
        }
    }

    /// Set the length option
    #[must_use]
    pub const fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the default value expression
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Mark as not null
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Mark as unique
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn render(&self, dialect: Dialect) -> Option<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }

        let mut def = format!("  {name}: t.{}(\"{name}\"", self.column_type);
        if let Some(length) = self.length.filter(|_| self.column_type == "varchar") {
            def.push_str(&format!(", {{ length: {length} }}"));
        }
        def.push(')');

        if self.primary_key {
            if dialect.is_sqlite_family() {
                if self.auto_increment {
                    def.push_str(".primaryKey({ autoIncrement: true })");
                } else {
                    def.push_str(".primaryKey()");
                }
            } else {
                def.push_str(".primaryKey()");
                if self.auto_increment && dialect == Dialect::Mysql {
                    def.push_str(".autoincrement()");
                }
            }
        } else {
            if self.not_null {
                def.push_str(".notNull()");
            }
            if self.unique {
                def.push_str(".unique()");
            }
        }

        if let Some(value) = self.default_value.as_deref().filter(|v| !v.trim().is_empty()) {
            if matches!(self.column_type.as_str(), "text" | "varchar") {
                def.push_str(&format!(".default(\"{value}\")"));
            } else {
                def.push_str(&format!(".default({value})"));
            }
        }

        Some(def)
    }
}

/// One table being drafted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTable {
    /// Table name; blank tables are skipped when rendering
    pub name: String,
    /// Columns in display order
    #[serde(default)]
    pub columns: Vec<DraftColumn>,
}

impl DraftTable {
    /// Create a table holding only the `id` primary key column
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![DraftColumn::id()],
        }
    }

    /// Append a column of the dialect's default type
    pub fn add_column(&mut self, name: impl Into<String>, dialect: Dialect) -> &mut DraftColumn {
        let index = self.columns.len();
        self.columns
            .push(DraftColumn::new(name, dialect.default_column_type()));
        &mut self.columns[index]
    }

    fn render(&self, dialect: Dialect) -> Option<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }

        let columns: Vec<String> = self
            .columns
            .iter()
            .filter_map(|column| column.render(dialect))
            .collect();
        if columns.is_empty() {
            return None;
        }

        Some(format!(
            "export const {name} = {}(\"{name}\", {{\n{}\n}});",
            dialect.factory(),
            columns.join(",\n")
        ))
    }
}

/// A set of drafted tables for one dialect
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaDraft {
    /// Target dialect
    #[serde(default)]
    pub dialect: Dialect,
    /// Tables in display order
    #[serde(default)]
    pub tables: Vec<DraftTable>,
}

impl SchemaDraft {
    /// Create an empty draft
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            tables: Vec::new(),
        }
    }

    /// Append a new table with an `id` column
    pub fn add_table(&mut self, name: impl Into<String>) -> &mut DraftTable {
        let index = self.tables.len();
        self.tables.push(DraftTable::new(name));
        &mut self.tables[index]
    }

    /// Remove the table at `index`, if present
    pub fn remove_table(&mut self, index: usize) -> Option<DraftTable> {
        (index < self.tables.len()).then(|| self.tables.remove(index))
    }

    /// Render declaration text: import lines, a blank line, then one
    /// declaration per named table
    #[must_use]
    pub fn render(&self) -> String {
        let tables: Vec<String> = self
            .tables
            .iter()
            .filter_map(|table| table.render(self.dialect))
            .collect();

        format!("{}\n\n{}", self.dialect.imports().join("\n"), tables.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{parse_schema, FieldType};

    #[test]
    fn test_new_table_starts_with_id() {
        let table = DraftTable::new("users");
        assert_eq!(table.columns.len(), 1);
        assert!(table.columns[0].primary_key);
        assert!(table.columns[0].auto_increment);
        assert_eq!(table.columns[0].column_type, "int");
    }

    #[test]
    fn test_postgres_render() {
        let mut draft = SchemaDraft::new(Dialect::Postgresql);
        let users = draft.add_table("users");
        users
            .columns
            .push(DraftColumn::new("email", "varchar").with_length(120).not_null().unique());
        users
            .columns
            .push(DraftColumn::new("nickname", "text").with_default("anon"));
        users
            .columns
            .push(DraftColumn::new("active", "boolean").with_default("true"));

        let expected = r#"import { pgTable } from "drizzle-orm/pg-core";
import * as t from "drizzle-orm/pg-core";

export const users = pgTable("users", {
  id: t.int("id").primaryKey(),
  email: t.varchar("email", { length: 120 }).notNull().unique(),
  nickname: t.text("nickname").default("anon"),
  active: t.boolean("active").default(true)
});"#;
        assert_eq!(draft.render(), expected);
    }

    #[test]
    fn test_sqlite_and_mysql_primary_keys() {
        let mut draft = SchemaDraft::new(Dialect::Turso);
        draft.add_table("notes");
        let text = draft.render();
        assert!(text.contains("export const notes = table(\"notes\", {"));
        assert!(text.contains(r#"id: t.int("id").primaryKey({ autoIncrement: true })"#));

        draft.dialect = Dialect::Mysql;
        let text = draft.render();
        assert!(text.contains(r#"id: t.int("id").primaryKey().autoincrement()"#));
        assert!(text.starts_with("import { mysqlTable }"));
    }

    #[test]
    fn test_primary_key_suppresses_modifiers() {
        let mut column = DraftColumn::id().unique();
        column.auto_increment = false;
        assert_eq!(
            column.render(Dialect::Sqlite).as_deref(),
            Some(r#"  id: t.int("id").primaryKey()"#)
        );
    }

    #[test]
    fn test_blank_names_skipped() {
        let mut draft = SchemaDraft::new(Dialect::Postgresql);
        draft.add_table("   ");
        let posts = draft.add_table("posts");
        posts.add_column("", Dialect::Postgresql);
        posts.add_column("title", Dialect::Postgresql);

        let text = draft.render();
        assert_eq!(text.matches("export const").count(), 1);
        assert!(text.contains(r#"title: t.varchar("title")"#));
    }

    #[test]
    fn test_render_parses_back() {
        let mut draft = SchemaDraft::new(Dialect::Sqlite);
        let posts = draft.add_table("posts");
        posts.add_column("title", Dialect::Sqlite).not_null = true;
        posts.add_column("score", Dialect::Sqlite).column_type = "real".to_string();

        let tables = parse_schema(&draft.render());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "posts");

        let fields = &tables[0].fields;
        assert_eq!(fields.len(), 3);
        assert!(fields[0].constraints.is_primary);
        assert_eq!(fields[1].field_type, FieldType::Text);
        assert!(fields[1].constraints.is_not_null);
        assert_eq!(fields[2].field_type, FieldType::Real);
    }

    #[test]
    fn test_remove_table() {
        let mut draft = SchemaDraft::default();
        draft.add_table("a");
        assert!(draft.remove_table(3).is_none());
        assert_eq!(draft.remove_table(0).map(|t| t.name), Some("a".to_string()));
    }

    #[test]
    fn test_dialect_parsing_and_json() {
        assert_eq!("Postgres".parse::<Dialect>(), Ok(Dialect::Postgresql));
        assert!("oracle".parse::<Dialect>().is_err());

        let draft: SchemaDraft = serde_json::from_str(
            r#"{"dialect":"mysql","tables":[{"name":"t1","columns":[{"name":"id","type":"int","primaryKey":true,"autoIncrement":true}]}]}"#,
        )
        .unwrap();
        assert_eq!(draft.dialect, Dialect::Mysql);
        assert!(draft.tables[0].columns[0].primary_key);
        assert!(!draft.tables[0].columns[0].not_null);
    }
}

//! Schema declaration parser
//!
//! Two phases:
//!
//! 1. **Block extraction** - a header pattern finds every
//!    `export const <Name> = <factory>("<dbName>", {` declaration, then a
//!    balanced-brace scan walks forward from the opening `{` to find the end
//!    of the fields block. A single regex cannot bound a block that itself
//!    contains `{ ... }` (default-value objects, column options), so the scan
//!    counts delimiters instead. Candidates whose braces never balance are
//!    dropped.
//! 2. **Field extraction** - the block is split into lines and every
//!    `name: definition` line becomes a [`Field`]. Types and constraints are
//!    inferred by substring tests on the definition.
//!
//! # Examples
//!
//! ```
//! use querysmith::schema::parse_schema;
//!
//! let tables = parse_schema(r#"
//! export const users = pgTable("users", {
//!   id: t.int().primaryKey(),
//!   email: t.text().notNull().unique(),
//! });
//! "#);
//!
//! assert_eq!(tables.len(), 1);
//! assert_eq!(tables[0].fields.len(), 2);
//! assert!(tables[0].fields[0].constraints.is_primary);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Constraints, Field, FieldType, Table};
use crate::config::ParserSettings;
use crate::error::{QuerySmithError, Result};

/// Type markers in priority order; the first one contained in a definition wins.
const TYPE_MARKERS: [(&str, FieldType); 13] = [
    ("text", FieldType::Text),
    ("varchar", FieldType::Varchar),
    ("serial", FieldType::Serial),
    ("int", FieldType::Int),
    ("timestamp", FieldType::Timestamp),
    ("boolean", FieldType::Boolean),
    ("bigint", FieldType::BigInt),
    ("decimal", FieldType::Decimal),
    ("date", FieldType::Date),
    ("json", FieldType::Json),
    ("uuid", FieldType::Uuid),
    ("real", FieldType::Real),
    ("blob", FieldType::Blob),
];

const COMMENT_MARKERS: [&str; 3] = ["//", "/*", "*"];

static ENUM_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z_$][A-Za-z0-9_$]*)\(").expect("Invalid regex"));

static LENGTH_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blength\s*:\s*(\d+)").expect("Invalid regex"));

static PRECISION_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bprecision\s*:\s*(\d+)").expect("Invalid regex"));

static DEFAULT_PARSER: Lazy<Option<SchemaParser>> = Lazy::new(|| {
    SchemaParser::new(&ParserSettings::default())
        .map_err(|e| tracing::error!(error = %e, "Failed to build default schema parser"))
        .ok()
});

/// Parse declaration text with the default table factories
///
/// Never fails: text without any recognizable declaration yields an empty
/// list, and so does an internal failure.
#[must_use]
pub fn parse_schema(source: &str) -> Vec<Table> {
    DEFAULT_PARSER
        .as_ref()
        .map_or_else(Vec::new, |parser| parser.parse(source))
}

/// Schema parser bound to a set of recognized table factory names
#[derive(Debug, Clone)]
pub struct SchemaParser {
    header: Regex,
}

impl SchemaParser {
    /// Build a parser for the configured factory names
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No factory names are configured
    /// - A factory name is not a plain identifier
    pub fn new(settings: &ParserSettings) -> Result<Self> {
        if settings.table_factories.is_empty() {
            return Err(QuerySmithError::Config(
                "At least one table factory must be configured".to_string(),
            ));
        }

        for factory in &settings.table_factories {
            let valid = !factory.is_empty()
                && factory
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
            if !valid {
                return Err(QuerySmithError::InvalidFactoryName(factory.clone()));
            }
        }

        let factories = settings
            .table_factories
            .iter()
            .map(|f| regex::escape(f))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = format!(
            r#"export\s+const\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?:{factories})\s*\(\s*["']([^"']+)["']\s*,\s*\{{"#
        );
        let header = Regex::new(&pattern).map_err(|e| QuerySmithError::Config(e.to_string()))?;

        Ok(Self { header })
    }

    /// Parse declaration text into tables
    ///
    /// Tables come back in declaration order. Candidates with unbalanced
    /// braces or without a single field line are skipped.
    #[must_use]
    pub fn parse(&self, source: &str) -> Vec<Table> {
        let mut tables = Vec::new();

        for caps in self.header.captures_iter(source) {
            let (Some(header), Some(name), Some(db_name)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };

            let start = header.end();
            let Some(end) = find_block_end(source, start) else {
                tracing::debug!(table = name.as_str(), "Dropping table with unbalanced braces");
                continue;
            };

            let fields = parse_fields(&source[start..end]);
            if fields.is_empty() {
                tracing::debug!(table = name.as_str(), "Dropping table without fields");
                continue;
            }

            tracing::debug!(table = name.as_str(), fields = fields.len(), "Parsed table");
            tables.push(Table {
                name: name.as_str().to_string(),
                db_name: db_name.as_str().to_string(),
                fields,
            });
        }

        tables
    }
}

/// Byte offset of the `}` closing a block whose `{` ends right before `start`
fn find_block_end(source: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, ch) in source.get(start..)?.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_fields(block: &str) -> Vec<Field> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !COMMENT_MARKERS.iter().any(|m| line.starts_with(m)))
        .filter_map(parse_field_line)
        .collect()
}

fn parse_field_line(line: &str) -> Option<Field> {
    let (name, definition) = line.split_once(':')?;
    let name = name.trim();
    let definition = definition.trim();
    let definition = definition.strip_suffix(',').unwrap_or(definition);

    if name.is_empty() || definition.is_empty() {
        return None;
    }

    Some(Field {
        name: name.to_string(),
        field_type: infer_type(definition),
        constraints: infer_constraints(definition),
        length: numeric_option(&LENGTH_OPTION, definition),
        precision: numeric_option(&PRECISION_OPTION, definition),
    })
}

fn infer_type(definition: &str) -> FieldType {
    if let Some((_, ty)) = TYPE_MARKERS
        .iter()
        .find(|(marker, _)| definition.contains(marker))
    {
        return ty.clone();
    }

    ENUM_CALL
        .captures(definition)
        .and_then(|caps| caps.get(1))
        .map_or(FieldType::Text, |ident| {
            FieldType::Enum(ident.as_str().to_string())
        })
}

fn infer_constraints(definition: &str) -> Constraints {
    Constraints {
        is_primary: definition.contains(".primaryKey("),
        is_unique: definition.contains(".unique("),
        is_not_null: definition.contains(".notNull("),
    }
}

fn numeric_option(pattern: &Regex, definition: &str) -> Option<u32> {
    pattern
        .captures(definition)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DEMO_SCHEMA;

    fn names(table: &Table) -> Vec<&str> {
        table.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_single_table_in_source_order() {
        let source = r#"
export const users = pgTable("users", {
  id: t.int().primaryKey(),
  email: t.varchar("email", { length: 255 }).notNull().unique(),
  isActive: t.boolean("is_active").default(true),
  createdAt: t.timestamp("created_at").defaultNow()
});
"#;
        let tables = parse_schema(source);
        assert_eq!(tables.len(), 1);

        let users = &tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(users.db_name, "users");
        assert_eq!(names(users), vec!["id", "email", "isActive", "createdAt"]);

        assert_eq!(users.fields[0].field_type, FieldType::Int);
        assert!(users.fields[0].constraints.is_primary);

        let email = &users.fields[1];
        assert_eq!(email.field_type, FieldType::Varchar);
        assert!(email.constraints.is_not_null);
        assert!(email.constraints.is_unique);
        assert!(!email.constraints.is_primary);
        assert_eq!(email.length, Some(255));

        assert_eq!(users.fields[2].field_type, FieldType::Boolean);
        assert_eq!(users.fields[3].field_type, FieldType::Timestamp);
    }

    #[test]
    fn test_nested_braces_do_not_end_block() {
        let source = r#"
export const comments = pgTable("comments", {
  id: t.int().primaryKey(),
  body: t.text({ length: 256 }),
  meta: t.json().default({ pinned: false }),
  postId: t.int("post_id")
});
"#;
        let tables = parse_schema(source);
        assert_eq!(tables.len(), 1);
        assert_eq!(names(&tables[0]), vec!["id", "body", "meta", "postId"]);
        assert_eq!(tables[0].fields[1].length, Some(256));
        assert_eq!(tables[0].fields[2].field_type, FieldType::Json);
    }

    #[test]
    fn test_unbalanced_block_is_dropped() {
        let source = r#"
export const good = pgTable("good", {
  id: t.int().primaryKey()
});

export const broken = pgTable("broken", {
  id: t.int().primaryKey(),
  meta: t.json().default({ open: true )
"#;
        let tables = parse_schema(source);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "good");
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse_schema("").is_empty());
        assert!(parse_schema("not a schema at all").is_empty());
        assert!(parse_schema("export const x = pgTable(").is_empty());
    }

    #[test]
    fn test_table_without_fields_is_dropped() {
        let source = r#"
export const empty = pgTable("empty", {
  // nothing yet
});
"#;
        assert!(parse_schema(source).is_empty());
    }

    #[test]
    fn test_comments_and_colonless_lines_skipped() {
        let source = r#"
export const posts = mysqlTable('posts', {
  // id: t.int(),
  /* title: t.text(), */
  * note: not a field
  ...timestamps,
  id: t.serial().primaryKey(),
  title: t.text().notNull()
});
"#;
        let tables = parse_schema(source);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].db_name, "posts");
        assert_eq!(names(&tables[0]), vec!["id", "title"]);
        assert_eq!(tables[0].fields[0].field_type, FieldType::Serial);
    }

    #[test]
    fn test_duplicate_field_names_are_kept() {
        let source = r#"
export const t1 = sqliteTable("t1", {
  name: t.text(),
  name: t.int()
});
"#;
        let tables = parse_schema(source);
        assert_eq!(names(&tables[0]), vec!["name", "name"]);
        assert_eq!(tables[0].fields[0].field_type, FieldType::Text);
        assert_eq!(tables[0].fields[1].field_type, FieldType::Int);
    }

    #[test]
    fn test_type_marker_priority() {
        // "bigint" contains "int", which is tested first
        assert_eq!(infer_type("t.bigint()"), FieldType::Int);
        // "text" outranks everything
        assert_eq!(infer_type("t.varchar(\"context\")"), FieldType::Text);
        assert_eq!(infer_type("t.decimal({ precision: 10 })"), FieldType::Decimal);
        assert_eq!(infer_type("t.uuid().defaultRandom()"), FieldType::Uuid);
        assert_eq!(infer_type("t.blob()"), FieldType::Blob);
    }

    #[test]
    fn test_enum_call_and_fallback() {
        assert_eq!(
            infer_type("moodEnum(\"mood\").notNull()"),
            FieldType::Enum("moodEnum".to_string())
        );
        assert_eq!(infer_type("t.custom()"), FieldType::Enum("custom".to_string()));
        assert_eq!(infer_type("someConstant"), FieldType::Text);
    }

    #[test]
    fn test_constraints_are_independent() {
        let constraints = infer_constraints("t.int().primaryKey().notNull().unique()");
        assert!(constraints.is_primary);
        assert!(constraints.is_not_null);
        assert!(constraints.is_unique);

        let constraints = infer_constraints("t.int().notNull");
        assert!(!constraints.is_not_null);
    }

    #[test]
    fn test_trailing_comma_and_empty_halves() {
        assert!(parse_field_line(": t.text()").is_none());
        assert!(parse_field_line("name: ,").is_none());

        let field = parse_field_line("price: t.decimal({ precision: 10, scale: 2 }),").unwrap();
        assert_eq!(field.name, "price");
        assert_eq!(field.precision, Some(10));
    }

    #[test]
    fn test_demo_schema() {
        let tables = parse_schema(DEMO_SCHEMA);
        let table_names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(table_names, vec!["users", "posts", "comments"]);
        assert_eq!(tables[0].fields.len(), 8);
        assert_eq!(tables[1].fields.len(), 7);
        assert_eq!(tables[2].fields.len(), 5);
    }

    #[test]
    fn test_custom_factories() {
        let settings = ParserSettings {
            table_factories: vec!["onchainTable".to_string()],
        };
        let parser = SchemaParser::new(&settings).unwrap();

        let source = r#"
export const transfers = onchainTable("transfers", {
  id: t.uuid().primaryKey()
});
export const users = pgTable("users", {
  id: t.int().primaryKey()
});
"#;
        let tables = parser.parse(source);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "transfers");
    }

    #[test]
    fn test_invalid_factory_settings() {
        let empty = ParserSettings {
            table_factories: Vec::new(),
        };
        assert!(matches!(
            SchemaParser::new(&empty),
            Err(QuerySmithError::Config(_))
        ));

        let bad = ParserSettings {
            table_factories: vec!["pg Table".to_string()],
        };
        assert!(matches!(
            SchemaParser::new(&bad),
            Err(QuerySmithError::InvalidFactoryName(name)) if name == "pg Table"
        ));
    }

    #[test]
    fn test_find_block_end() {
        let source = "{ a: { b: 1 } } tail";
        assert_eq!(find_block_end(source, 1), Some(14));
        assert_eq!(find_block_end("{ a: {", 1), None);
    }
}

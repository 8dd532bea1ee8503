//! Integration tests for schema parsing and validation

use querysmith::prelude::*;
use querysmith::schema::DEMO_SCHEMA;

/// The bundled demo schema parses into its three tables in order
#[test]
fn test_demo_schema_tables() {
    let tables = parse_schema(DEMO_SCHEMA);
    let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["users", "posts", "comments"]);

    let users = &tables[0];
    assert_eq!(users.db_name, "users");
    assert_eq!(users.fields.len(), 8);
    assert!(users.has_primary_key());

    let email = users.field("email").unwrap();
    assert_eq!(email.field_type, FieldType::Text);
    assert!(email.constraints.is_not_null);
    assert!(email.constraints.is_unique);
    assert!(!email.constraints.is_primary);

    let active = users.field("isActive").unwrap();
    assert_eq!(active.field_type, FieldType::Boolean);

    let created = users.field("createdAt").unwrap();
    assert_eq!(created.field_type, FieldType::Timestamp);

    let comment_text = tables[2].field("text").unwrap();
    assert_eq!(comment_text.length, Some(256));

    assert!(validate_tables(&tables).is_empty());
}

/// Nested braces inside a block do not end the table early
#[test]
fn test_nested_braces_and_comments() {
    let source = r#"
// leading comment
export const settings = pgTable("app_settings", {
  // the key
  id: t.serial().primaryKey(),
  prefs: t.json().default({ theme: { mode: "dark" } }),
  /* ignored */
  price: t.decimal({ precision: 10, scale: 2 }).notNull(),
});

export const after = pgTable("after", {
  id: t.int().primaryKey()
});
"#;

    let tables = parse_schema(source);
    assert_eq!(tables.len(), 2);

    let settings = &tables[0];
    assert_eq!(settings.db_name, "app_settings");
    let names: Vec<_> = settings.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["id", "prefs", "price"]);
    assert_eq!(settings.fields[1].field_type, FieldType::Json);
    assert_eq!(settings.fields[2].precision, Some(10));
    assert!(settings.fields[2].constraints.is_not_null);

    assert_eq!(tables[1].name, "after");
}

/// Text that holds no declaration parses to nothing
#[test]
fn test_non_schema_text() {
    for source in ["", "   ", "const x = 1;", "export const t = pgTable(\"t\", {"] {
        assert!(parse_schema(source).is_empty(), "parsed tables from {source:?}");
    }
}

/// Factory names are configurable
#[test]
fn test_custom_factory_names() {
    let source = r#"
export const transfers = onchainTable("transfers", {
  id: t.text().primaryKey(),
  amount: t.bigint().notNull()
});
"#;
    assert!(parse_schema(source).is_empty());

    let parser = SchemaParser::new(&ParserSettings {
        table_factories: vec!["onchainTable".to_string()],
    })
    .unwrap();
    let tables = parser.parse(source);
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].fields.len(), 2);
}

/// Invalid factory names are rejected up front
#[test]
fn test_rejects_bad_factory_names() {
    let result = SchemaParser::new(&ParserSettings {
        table_factories: vec!["pg.*Table".to_string()],
    });
    assert!(matches!(result, Err(QuerySmithError::InvalidFactoryName(_))));
}

/// Structural problems are reported without stopping the parse
#[test]
fn test_validation_findings() {
    let source = r#"
export const notes = pgTable("notes", {
  title: t.varchar(),
  title: t.text()
});
"#;
    let tables = parse_schema(source);
    assert_eq!(tables.len(), 1);

    let issues = validate_tables(&tables);
    assert!(issues.contains(&SchemaIssue::MissingPrimaryKey {
        table: "notes".to_string()
    }));
    assert!(issues.contains(&SchemaIssue::DuplicateField {
        table: "notes".to_string(),
        field: "title".to_string()
    }));
    assert!(issues.contains(&SchemaIssue::MissingLength {
        table: "notes".to_string(),
        field: "title".to_string()
    }));
}

/// Tables serialize with the documented JSON field names
#[test]
fn test_table_json_shape() {
    let tables = parse_schema(DEMO_SCHEMA);
    let json = serde_json::to_value(&tables[0]).unwrap();

    assert_eq!(json["name"], "users");
    assert_eq!(json["dbName"], "users");
    assert_eq!(json["fields"][0]["name"], "id");
    assert_eq!(json["fields"][0]["type"], "int");
    assert_eq!(json["fields"][0]["constraints"]["isPrimary"], true);
}

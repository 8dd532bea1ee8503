//! Property tests for the schema parser and literal rendering

use proptest::prelude::*;
use querysmith::codegen::helpers::TemplateHelpers;
use querysmith::prelude::*;

const TYPE_TOKENS: [&str; 9] = [
    "text",
    "varchar",
    "int",
    "boolean",
    "timestamp",
    "uuid",
    "json",
    "date",
    "real",
];

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    type_token: &'static str,
    primary: bool,
    not_null: bool,
    unique: bool,
}

impl FieldSpec {
    fn line(&self) -> String {
        let mut line = format!("  {}: t.{}()", self.name, self.type_token);
        if self.primary {
            line.push_str(".primaryKey()");
        }
        if self.not_null {
            line.push_str(".notNull()");
        }
        if self.unique {
            line.push_str(".unique()");
        }
        line
    }
}

fn arb_field() -> impl Strategy<Value = FieldSpec> {
    (
        "[a-z][a-zA-Z0-9_]{0,12}",
        prop::sample::select(TYPE_TOKENS.to_vec()),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, type_token, primary, not_null, unique)| FieldSpec {
            name,
            type_token,
            primary,
            not_null,
            unique,
        })
}

fn declaration(table: &str, fields: &[FieldSpec]) -> String {
    let lines: Vec<String> = fields.iter().map(FieldSpec::line).collect();
    format!(
        "export const {table} = pgTable(\"{table}\", {{\n{}\n}});\n",
        lines.join(",\n")
    )
}

proptest! {
    /// Arbitrary input never panics and never yields a table without fields
    #[test]
    fn prop_parse_never_panics(source in any::<String>()) {
        for table in parse_schema(&source) {
            prop_assert!(!table.fields.is_empty());
        }
    }

    /// Fragments around a header still never panic
    #[test]
    fn prop_parse_header_fragments(tail in "[{}a-z:(),. \n]{0,64}") {
        let source = format!("export const x = pgTable(\"x\", {{{tail}");
        let _ = parse_schema(&source);
    }

    /// Every generated field line becomes one field, in order, with its flags
    #[test]
    fn prop_field_lines_round_trip(fields in prop::collection::vec(arb_field(), 1..12)) {
        let tables = parse_schema(&declaration("things", &fields));
        prop_assert_eq!(tables.len(), 1);

        let parsed = &tables[0].fields;
        prop_assert_eq!(parsed.len(), fields.len());
        for (expected, field) in fields.iter().zip(parsed) {
            prop_assert_eq!(&field.name, &expected.name);
            prop_assert_eq!(field.field_type.token(), expected.type_token);
            prop_assert_eq!(field.constraints.is_primary, expected.primary);
            prop_assert_eq!(field.constraints.is_not_null, expected.not_null);
            prop_assert_eq!(field.constraints.is_unique, expected.unique);
        }
    }

    /// Several declarations come back in source order
    #[test]
    fn prop_tables_keep_declaration_order(
        names in prop::collection::btree_set("[a-z]{3,8}", 1..6),
        field in arb_field(),
    ) {
        let source: String = names
            .iter()
            .map(|name| declaration(name, std::slice::from_ref(&field)))
            .collect();
        let parsed: Vec<String> = parse_schema(&source).into_iter().map(|t| t.name).collect();
        let expected: Vec<String> = names.into_iter().collect();
        prop_assert_eq!(parsed, expected);
    }

    /// Integers render bare, text containing a letter is quoted
    #[test]
    fn prop_literal_numeric_rule(n in any::<i32>(), word in "[ghijklmnpqrstuvwyz][a-z]{0,7}") {
        prop_assert_eq!(TemplateHelpers::literal(&n.to_string(), false), n.to_string());

        let text = format!("{n}{word}");
        prop_assert_eq!(TemplateHelpers::literal(&text, false), format!("\"{text}\""));
    }

    /// Generation is deterministic for any Where value
    #[test]
    fn prop_generation_is_pure(value in "[ -~]{0,24}") {
        let tables = parse_schema(querysmith::schema::DEMO_SCHEMA);
        let config = QueryConfiguration::for_table("users").with_where("email", value);
        for kind in ArtifactKind::ALL {
            let first = generate(kind, tables.first(), &config);
            prop_assert!(!first.is_empty());
            prop_assert_eq!(first, generate(kind, tables.first(), &config));
        }
    }
}

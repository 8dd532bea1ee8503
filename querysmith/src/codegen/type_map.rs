//! Declared column type to generated value type and form input kind
//!
//! Both tables match case-insensitive substrings of the declared type token,
//! tested in a fixed order, and fall back to their own default. They are
//! independent of the parser's type vocabulary: `bigint` maps to `number`
//! because it contains `int`, while `uuid` falls through to the defaults.

use serde::Serialize;

/// Value type used in generated signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    /// `number`
    Number,
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `Date`
    Date,
}

impl ValueType {
    /// Type name as written in generated code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Date => "Date",
        }
    }

    /// Expression converting a submitted form entry to this type
    #[must_use]
    pub fn form_value(self, name: &str) -> String {
        match self {
            Self::Number => format!("Number(formData.get('{name}'))"),
            Self::Boolean => format!("formData.get('{name}') === 'on'"),
            Self::Date => format!("new Date(formData.get('{name}') as string)"),
            Self::String => format!("formData.get('{name}') as string"),
        }
    }
}

/// Form input kind used in generated page scaffolds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InputKind {
    /// `number`
    Number,
    /// `checkbox`
    Checkbox,
    /// `datetime-local`
    DateTime,
    /// `text`
    Text,
    /// Multi-line text area
    Multiline,
}

impl InputKind {
    /// Input type attribute
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::DateTime => "datetime-local",
            Self::Text => "text",
            Self::Multiline => "textarea",
        }
    }

    /// Whether the input renders as a text area
    #[must_use]
    pub const fn is_multiline(self) -> bool {
        matches!(self, Self::Multiline)
    }
}

const VALUE_TYPES: [(&str, ValueType); 5] = [
    ("int", ValueType::Number),
    ("varchar", ValueType::String),
    ("text", ValueType::String),
    ("boolean", ValueType::Boolean),
    ("timestamp", ValueType::Date),
];

const INPUT_KINDS: [(&str, InputKind); 5] = [
    ("int", InputKind::Number),
    ("boolean", InputKind::Checkbox),
    ("timestamp", InputKind::DateTime),
    ("varchar", InputKind::Text),
    ("text", InputKind::Multiline),
];

fn lookup<T: Copy>(table: &[(&str, T)], token: &str, default: T) -> T {
    let token = token.to_lowercase();
    table
        .iter()
        .find(|(marker, _)| token.contains(marker))
        .map_or(default, |(_, mapped)| *mapped)
}

/// Map a declared type token to a generated value type
#[must_use]
pub fn value_type(token: &str) -> ValueType {
    lookup(&VALUE_TYPES, token, ValueType::String)
}

/// Map a declared type token to a form input kind
#[must_use]
pub fn input_kind(token: &str) -> InputKind {
    lookup(&INPUT_KINDS, token, InputKind::Text)
}

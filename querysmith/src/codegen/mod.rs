//! Code generation from a table and a query configuration
//!
//! Four artifact kinds are produced from the same inputs:
//!
//! - [`ArtifactKind::InlineExpression`] - a fluent call chain with literal values
//! - [`ArtifactKind::StandaloneFunction`] - an async function taking the values as parameters
//! - [`ArtifactKind::ActionHandler`] - a server action wrapping the function
//! - [`ArtifactKind::PageComponent`] - a form page posting to the action
//!
//! Generation is pure: the same inputs always yield the same text, and an
//! unselected table yields an empty string.
//!
//! # Examples
//!
//! ```
//! use querysmith::codegen::{ArtifactKind, CodeGenerator};
//! use querysmith::config::GeneratorSettings;
//! use querysmith::query::{Operation, QueryConfiguration};
//! use querysmith::schema::parse_schema;
//!
//! # fn main() -> querysmith::error::Result<()> {
//! let tables = parse_schema(r#"
//! export const users = pgTable("users", {
//!   id: t.int().primaryKey(),
//!   age: t.int()
//! });
//! "#);
//!
//! let mut config = QueryConfiguration::for_table("users").with_operation(Operation::Create);
//! config.set_create_value("age", "42");
//!
//! let generator = CodeGenerator::new(GeneratorSettings::default())?;
//! let code = generator.generate(ArtifactKind::InlineExpression, tables.first(), &config);
//! assert!(code.contains("    age: 42,"));
//! # Ok(())
//! # }
//! ```

pub mod helpers;
mod metadata;
pub mod templates;
pub mod type_map;

pub use helpers::TemplateHelpers;
pub use templates::TemplateRegistry;
pub use type_map::{input_kind, value_type, InputKind, ValueType};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::GeneratorSettings;
use crate::error::Result;
use crate::query::{Operation, QueryConfiguration};
use crate::schema::Table;
use metadata::Metadata;

/// Generated source variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    /// Fluent call chain with the configured values inlined
    InlineExpression,
    /// Named async function
    StandaloneFunction,
    /// Server action around the function
    ActionHandler,
    /// Form page scaffold
    PageComponent,
}

impl ArtifactKind {
    /// All kinds in display order
    pub const ALL: [Self; 4] = [
        Self::StandaloneFunction,
        Self::ActionHandler,
        Self::PageComponent,
        Self::InlineExpression,
    ];

    /// Short name used on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InlineExpression => "inline",
            Self::StandaloneFunction => "function",
            Self::ActionHandler => "action",
            Self::PageComponent => "page",
        }
    }

    /// Name of the embedded template
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::InlineExpression => "inline.ts",
            Self::StandaloneFunction => "function.ts",
            Self::ActionHandler => "action.ts",
            Self::PageComponent => "page.tsx",
        }
    }

    const fn file_suffix(self) -> &'static str {
        match self {
            Self::InlineExpression => "-query.ts",
            Self::StandaloneFunction => ".ts",
            Self::ActionHandler => "-action.ts",
            Self::PageComponent => "-page.tsx",
        }
    }

    /// Download file name, e.g. `update-users-action.ts`
    #[must_use]
    pub fn file_name(self, operation: Operation, table: &str) -> String {
        format!("{}-{table}{}", operation.token(), self.file_suffix())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" | "query" | "expression" => Ok(Self::InlineExpression),
            "function" | "fn" => Ok(Self::StandaloneFunction),
            "action" | "server" => Ok(Self::ActionHandler),
            "page" | "component" => Ok(Self::PageComponent),
            other => Err(format!("Unknown artifact kind: {other}")),
        }
    }
}

/// One generated text blob with its download name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Variant
    pub kind: ArtifactKind,
    /// Suggested file name
    pub file_name: String,
    /// Generated source
    pub code: String,
}

/// Renders artifacts with a fixed set of settings
#[derive(Debug)]
pub struct CodeGenerator {
    settings: GeneratorSettings,
    templates: TemplateRegistry,
}

impl CodeGenerator {
    /// Create a generator
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded templates fail to compile
    pub fn new(settings: GeneratorSettings) -> Result<Self> {
        Ok(Self {
            settings,
            templates: TemplateRegistry::new()?,
        })
    }

    /// Active settings
    #[must_use]
    pub const fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate one artifact
    ///
    /// Returns an empty string when no table is given, when the
    /// configuration names no table, or when rendering fails (the failure
    /// is logged).
    #[must_use]
    pub fn generate(
        &self,
        kind: ArtifactKind,
        table: Option<&Table>,
        config: &QueryConfiguration,
    ) -> String {
        self.try_generate(kind, table, config).unwrap_or_else(|e| {
            tracing::warn!(error = %e, kind = %kind, "Generation failed");
            String::new()
        })
    }

    /// Generate one artifact, surfacing render errors
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails
    pub fn try_generate(
        &self,
        kind: ArtifactKind,
        table: Option<&Table>,
        config: &QueryConfiguration,
    ) -> Result<String> {
        let Some(table) = table else {
            return Ok(String::new());
        };
        if config.is_unselected() {
            return Ok(String::new());
        }

        tracing::debug!(kind = %kind, table = %table.name, operation = %config.operation, "Generating");
        let metadata = Metadata::new(table, config, &self.settings);

        match kind {
            ArtifactKind::InlineExpression => self.templates.render(kind, metadata.inline()),
            ArtifactKind::StandaloneFunction => self.templates.render(kind, metadata.function()),
            ArtifactKind::ActionHandler => {
                let function_code = self.templates.render(
                    ArtifactKind::StandaloneFunction,
                    metadata.function(),
                )?;
                self.templates.render(kind, metadata.action(&function_code))
            }
            ArtifactKind::PageComponent => self.templates.render(kind, metadata.page()),
        }
    }

    /// Generate one artifact for the table the configuration names
    #[must_use]
    pub fn generate_from(
        &self,
        kind: ArtifactKind,
        tables: &[Table],
        config: &QueryConfiguration,
    ) -> String {
        self.generate(kind, find_table(tables, config), config)
    }

    /// Generate every artifact kind
    ///
    /// Returns nothing when there is nothing to generate.
    #[must_use]
    pub fn generate_all(&self, table: Option<&Table>, config: &QueryConfiguration) -> Vec<Artifact> {
        let Some(table) = table else {
            return Vec::new();
        };

        ArtifactKind::ALL
            .into_iter()
            .map(|kind| Artifact {
                kind,
                file_name: kind.file_name(config.operation, &table.name),
                code: self.generate(kind, Some(table), config),
            })
            .filter(|artifact| !artifact.code.is_empty())
            .collect()
    }
}

/// Look up the table a configuration refers to
#[must_use]
pub fn find_table<'a>(tables: &'a [Table], config: &QueryConfiguration) -> Option<&'a Table> {
    let name = config.table.trim();
    tables.iter().find(|table| table.name == name)
}

static DEFAULT_GENERATOR: Lazy<Option<CodeGenerator>> = Lazy::new(|| {
    CodeGenerator::new(GeneratorSettings::default())
        .map_err(|e| tracing::error!(error = %e, "Failed to build default code generator"))
        .ok()
});

/// Generate one artifact with the default settings
///
/// Never fails; see [`CodeGenerator::generate`].
#[must_use]
pub fn generate(kind: ArtifactKind, table: Option<&Table>, config: &QueryConfiguration) -> String {
    DEFAULT_GENERATOR
        .as_ref()
        .map_or_else(String::new, |generator| generator.generate(kind, table, config))
}

//! Editing session state
//!
//! [`SchemaSession`] holds what a host UI shows: the schema text, the tables
//! parsed from it, the selected table and its query configuration. Every
//! change to the text re-parses eagerly; artifacts are regenerated from
//! scratch whenever they are requested.

use crate::codegen::{Artifact, ArtifactKind, CodeGenerator};
use crate::config::QuerySmithConfig;
use crate::error::Result;
use crate::query::{check_query, QueryConfiguration, QueryIssue};
use crate::schema::{validate_tables, SchemaIssue, SchemaParser, Table};

/// Message shown when non-blank text yields no tables
pub const NO_TABLES_ADVISORY: &str = "No valid tables found in schema. Please check the syntax.";

/// Schema text, parsed tables, selection and query configuration
#[derive(Debug)]
pub struct SchemaSession {
    parser: SchemaParser,
    generator: CodeGenerator,
    schema_text: String,
    tables: Vec<Table>,
    advisory: Option<&'static str>,
    selected: Option<String>,
    query: QueryConfiguration,
}

impl SchemaSession {
    /// Start an empty session
    ///
    /// # Errors
    ///
    /// Returns an error if the parser or generator cannot be built from the
    /// configuration
    pub fn new(config: &QuerySmithConfig) -> Result<Self> {
        Ok(Self {
            parser: SchemaParser::new(&config.parser)?,
            generator: CodeGenerator::new(config.generator.clone())?,
            schema_text: String::new(),
            tables: Vec::new(),
            advisory: None,
            selected: None,
            query: QueryConfiguration::default(),
        })
    }

    /// Replace the schema text and re-parse
    ///
    /// The selection survives when its table is still present; otherwise the
    /// first table is selected with a fresh configuration.
    pub fn set_schema_text(&mut self, text: impl Into<String>) {
        self.schema_text = text.into();

        if self.schema_text.trim().is_empty() {
            self.tables.clear();
            self.advisory = None;
            self.clear_selection();
            return;
        }

        self.tables = self.parser.parse(&self.schema_text);
        self.advisory = self.tables.is_empty().then_some(NO_TABLES_ADVISORY);
        tracing::debug!(tables = self.tables.len(), "Schema re-parsed");

        let still_present = self
            .selected
            .as_deref()
            .is_some_and(|name| self.tables.iter().any(|t| t.name == name));
        if still_present {
            return;
        }

        match self.tables.first().map(|t| t.name.clone()) {
            Some(first) => {
                self.select_table(&first);
            }
            None => self.clear_selection(),
        }
    }

    /// Current schema text
    #[must_use]
    pub fn schema_text(&self) -> &str {
        &self.schema_text
    }

    /// Tables from the last parse
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Advisory for the last parse, if any
    #[must_use]
    pub const fn advisory(&self) -> Option<&'static str> {
        self.advisory
    }

    /// Select a table by name, discarding the previous configuration
    ///
    /// Returns `false` and changes nothing when no such table exists.
    pub fn select_table(&mut self, name: &str) -> bool {
        if !self.tables.iter().any(|t| t.name == name) {
            return false;
        }
        self.selected = Some(name.to_string());
        self.query = QueryConfiguration::for_table(name);
        true
    }

    /// Selected table
    #[must_use]
    pub fn selected_table(&self) -> Option<&Table> {
        let name = self.selected.as_deref()?;
        self.tables.iter().find(|t| t.name == name)
    }

    /// Configuration for the selected table
    #[must_use]
    pub const fn query(&self) -> &QueryConfiguration {
        &self.query
    }

    /// Edit the configuration for the selected table
    pub fn query_mut(&mut self) -> &mut QueryConfiguration {
        &mut self.query
    }

    /// Structural issues in the parsed tables
    #[must_use]
    pub fn schema_issues(&self) -> Vec<SchemaIssue> {
        validate_tables(&self.tables)
    }

    /// Issues in the configuration against the selected table
    #[must_use]
    pub fn query_issues(&self) -> Vec<QueryIssue> {
        self.selected_table()
            .map(|table| check_query(table, &self.query))
            .unwrap_or_default()
    }

    /// Generate one artifact for the current state
    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> String {
        self.generator
            .generate(kind, self.selected_table(), &self.query)
    }

    /// Generate every artifact for the current state
    #[must_use]
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.generator
            .generate_all(self.selected_table(), &self.query)
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.query = QueryConfiguration::default();
    }
}

//! CLI command implementations

pub mod build;
pub mod demo;
pub mod export;
pub mod generate;
pub mod parse;

pub use build::BuildCommand;
pub use demo::DemoCommand;
pub use export::ExportCommand;
pub use generate::GenerateCommand;
pub use parse::ParseCommand;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use querysmith::query::{Direction, Operation, Quantity, QueryConfiguration};
use querysmith::{QuerySmithConfig, SchemaSession};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read schema text from a file, or from stdin when the path is `-`
///
/// # Errors
///
/// Returns an error if the input cannot be read
pub fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read schema from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path.display()))
}

/// Query options shared by `generate` and `export`
#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Schema file (`-` reads stdin)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Table to generate for (default: first table)
    #[arg(short, long)]
    pub table: Option<String>,

    /// Query configuration JSON to start from; flags override it
    #[arg(long = "query", value_name = "FILE")]
    pub query_file: Option<PathBuf>,

    /// Operation: create, get, update or destroy (default: get)
    #[arg(short, long)]
    pub op: Option<String>,

    /// Read a single record instead of all
    #[arg(long)]
    pub one: bool,

    /// Where clause as `column=value` (value may be empty)
    #[arg(long = "where", value_name = "COLUMN=VALUE")]
    pub where_clause: Option<String>,

    /// Sort as `column:asc` or `column:desc`
    #[arg(long, value_name = "COLUMN:DIRECTION")]
    pub order: Option<String>,

    /// Maximum number of records to read
    #[arg(long)]
    pub limit: Option<u32>,

    /// Create or update value as `field=value` (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub values: Vec<String>,
}

impl QueryArgs {
    /// Build a session with the schema loaded and the query configured
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The schema cannot be read or contains no tables
    /// - The requested table does not exist
    /// - An option is malformed
    pub fn session(&self, config: &QuerySmithConfig) -> Result<SchemaSession> {
        let mut session = SchemaSession::new(config)?;
        session.set_schema_text(read_source(&self.schema)?);

        if let Some(advisory) = session.advisory() {
            bail!("{advisory}");
        }
        if session.tables().is_empty() {
            bail!("Schema is empty");
        }

        let base = self.query_file.as_deref().map(load_query).transpose()?;
        let requested = self
            .table
            .clone()
            .or_else(|| base.as_ref().map(|q| q.table.trim().to_string()))
            .filter(|name| !name.is_empty());

        if let Some(table) = &requested {
            if !session.select_table(table) {
                let known: Vec<&str> = session.tables().iter().map(|t| t.name.as_str()).collect();
                bail!("Unknown table '{table}'. Available: {}", known.join(", "));
            }
        }

        if let Some(mut base) = base {
            base.table = session.query().table.clone();
            *session.query_mut() = base;
        }

        self.configure(&mut session)?;
        Ok(session)
    }

    fn configure(&self, session: &mut SchemaSession) -> Result<()> {
        let query = session.query_mut();
        if let Some(op) = &self.op {
            query.set_operation(op.parse::<Operation>().map_err(anyhow::Error::msg)?);
        }
        let operation = query.operation;

        if self.one {
            query.set_quantity(Quantity::One);
        }

        if let Some(clause) = &self.where_clause {
            let (column, value) = split_pair(clause, '=')?;
            query.set_where_clause(column, value);
        }

        if let Some(order) = &self.order {
            let (column, direction) = order.split_once(':').unwrap_or((order.as_str(), "asc"));
            let direction: Direction = direction.parse().map_err(anyhow::Error::msg)?;
            query.set_order_by(column.trim(), direction);
        }

        if self.limit.is_some() {
            query.set_limit(self.limit);
        }

        for pair in &self.values {
            let (field, value) = split_pair(pair, '=')?;
            match operation {
                Operation::Create => query.set_create_value(field, value),
                Operation::Update => query.set_update_value(field, value),
                Operation::Get | Operation::Destroy => {
                    bail!("--set only applies to create and update");
                }
            }
        }

        Ok(())
    }
}

/// Read a query configuration from JSON
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid configuration
pub fn load_query(path: &Path) -> Result<QueryConfiguration> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read query file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid query configuration: {}", path.display()))
}

/// Split `key<sep>value`, trimming the key
///
/// # Errors
///
/// Returns an error if the separator is missing or the key is blank
pub fn split_pair(pair: &str, separator: char) -> Result<(&str, &str)> {
    let Some((key, value)) = pair.split_once(separator) else {
        bail!("Invalid value '{pair}'. Expected 'key{separator}value'");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid value '{pair}'. Key must not be empty");
    }
    Ok((key, value))
}

/// Print query findings to stderr
pub fn report_query_issues(session: &SchemaSession) {
    for issue in session.query_issues() {
        eprintln!("{} {issue}", style("warning:").yellow().bold());
    }
}

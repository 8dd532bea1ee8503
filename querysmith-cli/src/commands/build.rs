//! Schema draft rendering command

use anyhow::{Context, Result};
use clap::Args;
use querysmith::schema::{Dialect, SchemaDraft};
use std::fs;
use std::path::PathBuf;

/// Render a JSON schema draft into declaration text
///
/// The draft file holds `{ "dialect": "postgresql", "tables": [...] }`.
#[derive(Debug, Clone, Args)]
pub struct BuildCommand {
    /// Draft file in JSON
    #[arg(value_name = "DRAFT")]
    pub draft: PathBuf,

    /// Override the draft's dialect
    #[arg(long)]
    pub dialect: Option<String>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl BuildCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be read or parsed, or the output
    /// cannot be written
    pub fn execute(&self) -> Result<()> {
        let text = fs::read_to_string(&self.draft)
            .with_context(|| format!("Failed to read draft: {}", self.draft.display()))?;
        let rendered = self.render(&text)?;

        match &self.output {
            Some(path) => fs::write(path, rendered)
                .with_context(|| format!("Failed to write schema: {}", path.display()))?,
            None => println!("{rendered}"),
        }
        Ok(())
    }

    /// Render draft JSON into declaration text
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON or the dialect override is invalid
    pub fn render(&self, draft_json: &str) -> Result<String> {
        let mut draft: SchemaDraft =
            serde_json::from_str(draft_json).context("Invalid schema draft")?;

        if let Some(dialect) = &self.dialect {
            draft.dialect = dialect.parse::<Dialect>().map_err(anyhow::Error::msg)?;
        }

        Ok(draft.render())
    }
}

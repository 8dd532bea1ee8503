//! Artifact generation command

use anyhow::{bail, Result};
use clap::Args;
use querysmith::{ArtifactKind, QuerySmithConfig, SchemaSession};

use super::{report_query_issues, QueryArgs};

/// Print one generated artifact for a table
///
/// Examples:
///   querysmith generate schema.ts --table users --op get --where email=a@b.c
///   querysmith generate schema.ts --op update --where id= --set age=31 --kind action
#[derive(Debug, Clone, Args)]
pub struct GenerateCommand {
    /// Schema and query options
    #[command(flatten)]
    pub query: QueryArgs,

    /// Artifact: inline, function, action or page
    #[arg(short, long, default_value = "inline")]
    pub kind: String,

    /// Fail instead of warning when the query has problems
    #[arg(long)]
    pub strict: bool,
}

impl GenerateCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the schema or options are invalid, or in strict
    /// mode if the query has problems
    pub fn execute(&self, config: &QuerySmithConfig) -> Result<()> {
        let session = self.query.session(config)?;
        print!("{}", self.render(&session)?);
        Ok(())
    }

    /// Generate the requested artifact
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is unknown, or in strict mode if the
    /// query has problems
    pub fn render(&self, session: &SchemaSession) -> Result<String> {
        let kind: ArtifactKind = self.kind.parse().map_err(anyhow::Error::msg)?;

        if self.strict {
            let issues = session.query_issues();
            if let Some(first) = issues.first() {
                bail!("{first} ({} problem(s) total)", issues.len());
            }
        } else {
            report_query_issues(session);
        }

        tracing::debug!(kind = %kind, "Generating artifact");
        Ok(session.artifact(kind))
    }
}

//! Artifact export command

use anyhow::{Context, Result};
use clap::Args;
use console::{style, Emoji};
use querysmith::export::{export_artifacts, ArtifactSink, DirectorySink};
use querysmith::highlight::{HighlightCoordinator, HighlightOutcome, PlainHighlighter};
use querysmith::{QuerySmithConfig, SchemaSession};
use std::path::PathBuf;
use std::sync::Arc;

use super::{report_query_issues, QueryArgs};

static SUCCESS: Emoji = Emoji("✓", "+");

/// Write every artifact for a table into a directory
#[derive(Debug, Clone, Args)]
pub struct ExportCommand {
    /// Schema and query options
    #[command(flatten)]
    pub query: QueryArgs,

    /// Output directory
    #[arg(long, default_value = "generated")]
    pub out: PathBuf,

    /// Also write highlighted HTML next to each artifact
    #[arg(long)]
    pub html: bool,
}

impl ExportCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the schema or options are invalid or a file
    /// cannot be written
    pub async fn execute(&self, config: &QuerySmithConfig) -> Result<()> {
        let session = self.query.session(config)?;
        report_query_issues(&session);

        for path in self.write(&session, config).await? {
            println!("  {} {}", SUCCESS, style(path.display()).green());
        }
        Ok(())
    }

    /// Write the artifacts and return the paths created
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written
    pub async fn write(
        &self,
        session: &SchemaSession,
        config: &QuerySmithConfig,
    ) -> Result<Vec<PathBuf>> {
        let sink = DirectorySink::new(&self.out);
        let artifacts = session.artifacts();

        let mut paths = export_artifacts(&sink, &artifacts)
            .with_context(|| format!("Failed to export into {}", self.out.display()))?;

        if self.html {
            let coordinator =
                HighlightCoordinator::new(Arc::new(PlainHighlighter), config.highlight.clone());
            let sources: Vec<String> = artifacts.iter().map(|a| a.code.clone()).collect();

            if let HighlightOutcome::Applied(highlighted) = coordinator.submit(&sources).await {
                for (artifact, markup) in artifacts.iter().zip(&highlighted.markup) {
                    let name = format!("{}.html", artifact.file_name);
                    paths.push(sink.save_as_file(markup, &name)?);
                }
            }
        }

        tracing::info!(count = paths.len(), out = %self.out.display(), "Exported artifacts");
        Ok(paths)
    }
}

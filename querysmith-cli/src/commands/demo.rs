//! Demo schema command

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use querysmith::schema::DEMO_SCHEMA;
use std::fs;
use std::path::PathBuf;

/// Print the bundled demo schema, or write it to a file
#[derive(Debug, Clone, Args)]
pub struct DemoCommand {
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl DemoCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the output file cannot be written
    pub fn execute(&self) -> Result<()> {
        let Some(path) = &self.output else {
            print!("{DEMO_SCHEMA}");
            return Ok(());
        };

        fs::write(path, DEMO_SCHEMA)
            .with_context(|| format!("Failed to write demo schema: {}", path.display()))?;
        println!("Wrote demo schema to {}", style(path.display()).green());
        println!(
            "Try: {}",
            style(format!("querysmith generate {} --table posts", path.display())).cyan()
        );
        Ok(())
    }
}

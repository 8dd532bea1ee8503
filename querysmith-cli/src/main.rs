//! querysmith CLI tool

use anyhow::Result;
use clap::{Parser, Subcommand};
use querysmith_cli_lib::{
    load_config, BuildCommand, DemoCommand, ExportCommand, GenerateCommand, ParseCommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "querysmith")]
#[command(version)]
#[command(about = "Generate CRUD code from Drizzle-style schema declarations", long_about = None)]
struct Cli {
    /// Configuration file (default: ./querysmith.toml and the user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a schema and list its tables
    Parse(ParseCommand),
    /// Print one generated artifact
    Generate(GenerateCommand),
    /// Write all artifacts for a table into a directory
    Export(ExportCommand),
    /// Render a JSON schema draft into declaration text
    Build(BuildCommand),
    /// Print the bundled demo schema
    Demo(DemoCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    querysmith::observability::init()?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse(cmd) => cmd.execute(&config)?,
        Commands::Generate(cmd) => cmd.execute(&config)?,
        Commands::Export(cmd) => cmd.execute(&config).await?,
        Commands::Build(cmd) => cmd.execute()?,
        Commands::Demo(cmd) => cmd.execute()?,
    }

    Ok(())
}

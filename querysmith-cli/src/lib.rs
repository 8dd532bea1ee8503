//! querysmith CLI library

pub mod commands;

pub use commands::{
    BuildCommand, DemoCommand, ExportCommand, GenerateCommand, ParseCommand, QueryArgs,
};

use anyhow::Result;
use querysmith::QuerySmithConfig;
use std::path::Path;

/// Load configuration from an explicit file or the standard locations
///
/// # Errors
///
/// Returns an error if a configuration source cannot be parsed
pub fn load_config(path: Option<&Path>) -> Result<QuerySmithConfig> {
    let config = match path {
        Some(path) => QuerySmithConfig::load_from(path)?,
        None => QuerySmithConfig::load()?,
    };
    Ok(config)
}

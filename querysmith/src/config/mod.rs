//! Configuration management for querysmith
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `QUERYSMITH_` prefix, `__` for nesting)
//! 2. `./querysmith.toml` (project)
//! 3. `~/.config/querysmith/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # querysmith.toml
//! [parser]
//! table_factories = ["pgTable", "mysqlTable", "sqliteTable", "table"]
//!
//! [generator]
//! schema_import = "@/db/schema"
//! escape_string_literals = false
//!
//! [highlight]
//! language = "typescript"
//! theme = "dark-plus"
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{QuerySmithError, Result};

/// Schema parser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Factory call names recognized in `export const X = <factory>("name", {` headers
    pub table_factories: Vec<String>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            table_factories: ["mysqlTable", "pgTable", "sqliteTable", "table"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Code generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Module exporting the database handle
    pub db_import: String,

    /// Module exporting the table definitions
    pub schema_import: String,

    /// Module exporting `CrudAbstractions`
    pub crud_import: String,

    /// Module the page component imports its action handler from
    pub actions_import: String,

    /// Directory holding the UI components used by the page scaffold
    pub ui_import: String,

    /// Escape `"` and `\` inside emitted string literals
    pub escape_string_literals: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            db_import: "@/lib/db".to_string(),
            schema_import: "@/lib/schema".to_string(),
            crud_import: "@/lib/crud-abstractions".to_string(),
            actions_import: "@/app/actions".to_string(),
            ui_import: "@/components/ui".to_string(),
            escape_string_literals: false,
        }
    }
}

/// Syntax highlighting settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Language passed to the highlighter
    pub language: String,

    /// Theme passed to the highlighter
    pub theme: String,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            language: "typescript".to_string(),
            theme: "dark-plus".to_string(),
        }
    }
}

/// Complete querysmith configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuerySmithConfig {
    /// Schema parser settings
    #[serde(default)]
    pub parser: ParserSettings,

    /// Code generator settings
    #[serde(default)]
    pub generator: GeneratorSettings,

    /// Syntax highlighting settings
    #[serde(default)]
    pub highlight: HighlightSettings,
}

impl QuerySmithConfig {
    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file exists but cannot be parsed
    /// - Values fail type conversion
    pub fn load() -> Result<Self> {
        let mut figment = Self::defaults()?;

        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./querysmith.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        let config = figment
            .merge(Env::prefixed("QUERYSMITH_").split("__").lowercase(true))
            .extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file yields the defaults (still overridden by environment
    /// variables).
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values fail
    /// type conversion.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::defaults()?
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("QUERYSMITH_").split("__").lowercase(true))
            .extract()?;
        Ok(config)
    }

    /// Get the recommended XDG config path
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./querysmith.toml"),
            |config_dir| config_dir.join("querysmith").join("config.toml"),
        )
    }

    fn defaults() -> Result<Figment> {
        let defaults = toml::to_string(&Self::default())
            .map_err(|e| QuerySmithError::Config(e.to_string()))?;
        Ok(Figment::new().merge(Toml::string(&defaults)))
    }
}

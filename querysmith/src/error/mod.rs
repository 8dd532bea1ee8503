//! Error types and error handling
//!
//! Parsing and generation never surface these to callers of
//! [`crate::parse_schema`] or [`crate::generate`]; those entry points log the
//! failure and degrade to an empty value. The fallible building blocks
//! underneath return [`QuerySmithError`].

use thiserror::Error;

/// Library error type
#[derive(Debug, Error)]
pub enum QuerySmithError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A table factory name cannot be used in the declaration header pattern
    #[error("Invalid table factory name: '{0}'")]
    InvalidFactoryName(String),

    /// Template registration or rendering failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact export failed
    #[error("Export error: {0}")]
    Export(String),
}

impl From<figment::Error> for QuerySmithError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Errors raised by the CRUD abstraction runtime
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// `update().run()` or `destroy().run()` executed without a prior filter
    #[error("{operation} requires a Where clause")]
    MissingWhereClause {
        /// Runtime operation that refused to run (`Update` or `Delete`)
        operation: &'static str,
    },

    /// The storage backend rejected the operation
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors raised by a syntax highlighter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    /// The highlighter could not produce markup
    #[error("Highlighting failed: {0}")]
    Failed(String),
}

/// Convenience result alias
pub type Result<T, E = QuerySmithError> = std::result::Result<T, E>;

//! querysmith: schema declaration parser and CRUD code generator
//!
//! Paste a Drizzle-style TypeScript schema, pick a table and an operation,
//! and get back ready-to-use source text:
//!
//! - **schema**: Parse `export const x = pgTable("x", { ... })` declarations into tables
//! - **query**: Describe a Create/Get/Update/Destroy query against one table
//! - **codegen**: Render inline expressions, functions, server actions and form pages
//! - **runtime**: Execute the same fluent chain against a pluggable backend
//!
//! # Quick Start
//!
//! ```rust
//! use querysmith::prelude::*;
//!
//! let tables = parse_schema(r#"
//! export const users = pgTable("users", {
//!   id: t.int().primaryKey(),
//!   email: t.text().notNull()
//! });
//! "#);
//!
//! let config = QueryConfiguration::for_table("users").with_where("email", "a@b.c");
//! let code = generate(ArtifactKind::InlineExpression, tables.first(), &config);
//!
//! assert!(code.contains("const records = await usersCrud.get(\"All\")"));
//! assert!(code.contains(r#".Where("email", "a@b.c")"#));
//! ```
//!
//! Parsing and generation never fail from the caller's point of view: text
//! that is not a schema parses to no tables, and generation without a
//! selected table yields an empty string.

pub mod codegen;
pub mod config;
pub mod error;
pub mod export;
pub mod highlight;
pub mod observability;
pub mod query;
pub mod runtime;
pub mod schema;
pub mod session;

pub use codegen::{generate, Artifact, ArtifactKind, CodeGenerator};
pub use config::QuerySmithConfig;
pub use error::{QuerySmithError, Result};
pub use query::{Operation, QueryConfiguration};
pub use schema::{parse_schema, Field, FieldType, Table};
pub use session::SchemaSession;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use querysmith::prelude::*;
    //! ```

    pub use crate::codegen::{generate, Artifact, ArtifactKind, CodeGenerator};
    pub use crate::config::{GeneratorSettings, HighlightSettings, ParserSettings, QuerySmithConfig};
    pub use crate::error::{QuerySmithError, Result, RuntimeError};
    pub use crate::export::{export_artifacts, ArtifactSink, Clipboard, DirectorySink};
    pub use crate::highlight::{HighlightCoordinator, HighlightOutcome, Highlighter, PlainHighlighter};
    pub use crate::query::{
        check_query, Direction, Operation, Quantity, QueryConfiguration, QueryIssue,
    };
    pub use crate::runtime::{CrudAbstractions, CrudBackend, Fetched, MemoryBackend, Record};
    pub use crate::schema::{
        parse_schema, validate_tables, Constraints, Dialect, Field, FieldType, SchemaDraft,
        SchemaIssue, SchemaParser, Table,
    };
    pub use crate::session::SchemaSession;
}

//! Schema inspection command

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use querysmith::schema::{SchemaIssue, Severity, Table};
use querysmith::{QuerySmithConfig, SchemaSession};
use std::fmt::Write as _;
use std::path::PathBuf;

use super::read_source;

/// Parse a schema file and list its tables
#[derive(Debug, Clone, Args)]
pub struct ParseCommand {
    /// Schema file (`-` reads stdin)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Print tables as JSON
    #[arg(long)]
    pub json: bool,
}

impl ParseCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be read
    pub fn execute(&self, config: &QuerySmithConfig) -> Result<()> {
        let mut session = SchemaSession::new(config)?;
        session.set_schema_text(read_source(&self.schema)?);

        if let Some(advisory) = session.advisory() {
            eprintln!("{} {advisory}", style("warning:").yellow().bold());
        }

        print!("{}", self.render(session.tables())?);

        for issue in session.schema_issues() {
            print_issue(&issue);
        }
        Ok(())
    }

    /// Render the table listing
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails
    pub fn render(&self, tables: &[Table]) -> Result<String> {
        if self.json {
            let mut json =
                serde_json::to_string_pretty(tables).context("Failed to serialize tables")?;
            json.push('\n');
            return Ok(json);
        }

        let mut out = String::new();
        for table in tables {
            let _ = writeln!(
                out,
                "{} ({}, {} fields)",
                table.name,
                table.db_name,
                table.fields.len()
            );
            for field in &table.fields {
                let _ = writeln!(out, "  {}: {}{}", field.name, field.field_type, flags(field));
            }
        }
        Ok(out)
    }
}

fn flags(field: &querysmith::Field) -> String {
    let mut flags = String::new();
    if field.constraints.is_primary {
        flags.push_str(" primary");
    }
    if field.constraints.is_not_null {
        flags.push_str(" not-null");
    }
    if field.constraints.is_unique {
        flags.push_str(" unique");
    }
    flags
}

fn print_issue(issue: &SchemaIssue) {
    let label = match issue.severity() {
        Severity::Error => style("error:").red().bold(),
        Severity::Warning => style("warning:").yellow().bold(),
    };
    eprintln!("{label} {issue}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use querysmith::parse_schema;

    const SCHEMA: &str = r#"
export const users = pgTable("app_users", {
  id: t.int().primaryKey(),
  email: t.text().notNull().unique()
});
"#;

    fn command(json: bool) -> ParseCommand {
        ParseCommand {
            schema: PathBuf::from("-"),
            json,
        }
    }

    #[test]
    fn test_render_listing() {
        let out = command(false).render(&parse_schema(SCHEMA)).unwrap();
        assert_eq!(
            out,
            "users (app_users, 2 fields)\n  id: int primary\n  email: text not-null unique\n"
        );
    }

    #[test]
    fn test_render_json() {
        let out = command(true).render(&parse_schema(SCHEMA)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["dbName"], "app_users");
        assert_eq!(value[0]["fields"][1]["constraints"]["isUnique"], true);
    }
}

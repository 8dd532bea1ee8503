//! Template variables for each artifact kind
//!
//! Everything that depends on the table or the configuration is resolved
//! here; the templates only lay the pieces out.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

use super::helpers::TemplateHelpers;
use super::type_map::{input_kind, value_type, ValueType};
use crate::config::GeneratorSettings;
use crate::query::{Operation, QueryConfiguration};
use crate::schema::{Field, Table};

/// Column a Where clause filters on, with the type token used for mapping
#[derive(Debug, Clone, Copy)]
struct WhereTarget<'a> {
    column: &'a str,
    type_token: &'a str,
}

impl WhereTarget<'_> {
    fn value_type(self) -> ValueType {
        value_type(self.type_token)
    }

    fn param(self) -> String {
        format!("{}: {}", self.column, self.value_type().as_str())
    }
}

#[derive(Debug, Serialize)]
struct PageInput {
    name: String,
    label: String,
    kind: &'static str,
    multiline: bool,
    required: bool,
}

/// Resolved names and lookups for one (table, configuration) pair
#[derive(Debug)]
pub(super) struct Metadata<'a> {
    table: &'a Table,
    config: &'a QueryConfiguration,
    settings: &'a GeneratorSettings,
    handle: &'a str,
    pascal: String,
}

impl<'a> Metadata<'a> {
    pub(super) fn new(
        table: &'a Table,
        config: &'a QueryConfiguration,
        settings: &'a GeneratorSettings,
    ) -> Self {
        Self {
            table,
            config,
            settings,
            handle: config.table.trim(),
            pascal: TemplateHelpers::to_pascal_case(&table.name),
        }
    }

    const fn operation(&self) -> Operation {
        self.config.operation
    }

    pub(super) fn function_name(&self) -> String {
        format!("{}{}", self.operation().token(), self.pascal)
    }

    fn handler_name(&self) -> String {
        format!("handle{}{}", self.operation().label(), self.pascal)
    }

    fn title(&self) -> String {
        format!("{} {}", self.operation().label(), self.pascal)
    }

    fn where_target(&self) -> Option<WhereTarget<'a>> {
        match self.config.where_column() {
            Some(column) => Some(WhereTarget {
                column,
                type_token: self
                    .table
                    .field(column)
                    .map_or("", |field| field.field_type.token()),
            }),
            None if self.operation().requires_where() => Some(WhereTarget {
                column: "id",
                type_token: self
                    .table
                    .field("id")
                    .map_or("int", |field| field.field_type.token()),
            }),
            None => None,
        }
    }

    fn literal(&self, value: &str) -> String {
        TemplateHelpers::literal(value, self.settings.escape_string_literals)
    }

    /// `key: literal,` lines for non-blank entries, indented for the chain
    fn payload_lines(&self, data: &IndexMap<String, String>) -> Vec<String> {
        data.iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| format!("  {key}: {},", self.literal(value)))
            .collect()
    }

    fn inline_where(&self) -> String {
        match (self.config.where_column(), self.config.where_value()) {
            (Some(column), Some(value)) => {
                format!(".Where(\"{column}\", {})", self.literal(value))
            }
            (Some(column), None) => format!(".Where(\"{column}\", {column})"),
            (None, _) => ".Where(\"id\", id)".to_string(),
        }
    }

    fn read_clauses(&self, where_line: Option<String>) -> Vec<String> {
        let mut chain: Vec<String> = where_line.into_iter().collect();
        if let Some((column, direction)) = self.config.order() {
            chain.push(format!(".Order(\"{column}\", \"{direction}\")"));
        }
        if let Some(limit) = self.config.effective_limit() {
            chain.push(format!(".Limit({limit})"));
        }
        chain.push(".run()".to_string());
        chain
    }

    fn header(&self) -> (&'static str, &'static str, String) {
        match self.operation() {
            Operation::Create => ("// Create new record", "newRecord", "create()".to_string()),
            Operation::Get => (
                "// Read records",
                "records",
                format!("get(\"{}\")", self.config.quantity),
            ),
            Operation::Update => ("// Update records", "updatedRecords", "update()".to_string()),
            Operation::Destroy => ("// Delete records", "deletedRecords", "destroy()".to_string()),
        }
    }

    pub(super) fn inline(&self) -> Value {
        let (comment, binding, call) = self.header();

        let chain = match self.operation() {
            Operation::Create => {
                let mut chain = vec![".run({".to_string()];
                chain.extend(self.payload_lines(&self.config.create_data));
                chain.push("})".to_string());
                chain
            }
            Operation::Get => {
                let where_line = self
                    .config
                    .where_column()
                    .zip(self.config.where_value())
                    .map(|(column, value)| format!(".Where(\"{column}\", {})", self.literal(value)));
                self.read_clauses(where_line)
            }
            Operation::Update => {
                let mut chain = vec![self.inline_where(), ".Set({".to_string()];
                chain.extend(self.payload_lines(&self.config.update_data));
                chain.push("})".to_string());
                chain.push(".run()".to_string());
                chain
            }
            Operation::Destroy => vec![self.inline_where(), ".run()".to_string()],
        };

        json!({
            "table": self.handle,
            "comment": comment,
            "binding": binding,
            "call": call,
            "chain": chain,
        })
    }

    fn payload_params(&self, optional: fn(&Field) -> bool) -> String {
        let params: Vec<String> = self
            .table
            .payload_fields()
            .map(|field| {
                format!(
                    "{}{}: {}",
                    field.name,
                    if optional(field) { "?" } else { "" },
                    value_type(field.field_type.token()).as_str()
                )
            })
            .collect();

        if params.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", params.join(", "))
        }
    }

    pub(super) fn function(&self) -> Value {
        let (_, binding, call) = self.header();
        let target = self.where_target();
        let where_line = target.map(|t| format!(".Where(\"{0}\", {0})", t.column));

        let (params, chain) = match self.operation() {
            Operation::Create => (
                format!(
                    "data: {}",
                    self.payload_params(|field| !field.constraints.is_not_null)
                ),
                vec![".run(data)".to_string()],
            ),
            Operation::Get => (
                target.map(WhereTarget::param).unwrap_or_default(),
                self.read_clauses(where_line),
            ),
            Operation::Update => (
                format!(
                    "{}, updates: {}",
                    target.map(WhereTarget::param).unwrap_or_default(),
                    self.payload_params(|_| true)
                ),
                where_line
                    .into_iter()
                    .chain([".Set(updates)".to_string(), ".run()".to_string()])
                    .collect(),
            ),
            Operation::Destroy => (
                target.map(WhereTarget::param).unwrap_or_default(),
                where_line
                    .into_iter()
                    .chain([".run()".to_string()])
                    .collect(),
            ),
        };

        json!({
            "table": self.handle,
            "function_name": self.function_name(),
            "params": params,
            "binding": binding,
            "call": call,
            "chain": chain,
        })
    }

    fn data_block(&self) -> Vec<String> {
        let entries: Vec<String> = self
            .table
            .payload_fields()
            .map(|field| {
                let converted = value_type(field.field_type.token()).form_value(&field.name);
                format!("      {}: {converted},", field.name)
            })
            .collect();

        if entries.is_empty() {
            return vec!["    const data = {}".to_string()];
        }

        let mut block = vec!["    const data = {".to_string()];
        block.extend(entries);
        block.push("    }".to_string());
        block
    }

    pub(super) fn action(&self, function_code: &str) -> Value {
        let function_name = self.function_name();
        let target = self.where_target();

        let extract_where = |target: WhereTarget<'_>| {
            format!(
                "    const {} = {}",
                target.column,
                target.value_type().form_value(target.column)
            )
        };

        let mut body = Vec::new();
        match (self.operation(), target) {
            (Operation::Create, _) => {
                body.extend(self.data_block());
                body.push(format!("    const result = await {function_name}(data)"));
            }
            (Operation::Get, None) => {
                body.push(format!("    const result = await {function_name}()"));
            }
            (Operation::Update, Some(target)) => {
                body.push(extract_where(target));
                body.extend(self.data_block());
                body.push(format!(
                    "    const result = await {function_name}({}, data)",
                    target.column
                ));
            }
            (Operation::Get | Operation::Destroy, Some(target)) => {
                body.push(extract_where(target));
                body.push(format!(
                    "    const result = await {function_name}({})",
                    target.column
                ));
            }
            // update and destroy always resolve a target
            (Operation::Update | Operation::Destroy, None) => {}
        }

        json!({
            "table": self.handle,
            "db_import": self.settings.db_import,
            "schema_import": self.settings.schema_import,
            "crud_import": self.settings.crud_import,
            "function_code": function_code,
            "handler_name": self.handler_name(),
            "body": body,
            "token": self.operation().token(),
        })
    }

    fn field_input(field: &Field) -> PageInput {
        let kind = input_kind(field.field_type.token());
        PageInput {
            name: field.name.clone(),
            label: TemplateHelpers::capitalize(&field.name),
            kind: kind.as_str(),
            multiline: kind.is_multiline(),
            required: field.constraints.is_not_null,
        }
    }

    fn where_input(target: WhereTarget<'_>) -> PageInput {
        let kind = input_kind(target.type_token);
        PageInput {
            name: target.column.to_string(),
            label: TemplateHelpers::capitalize(target.column),
            kind: kind.as_str(),
            multiline: kind.is_multiline(),
            required: true,
        }
    }

    pub(super) fn page(&self) -> Value {
        let target = self.where_target();
        let payload = || self.table.payload_fields().map(Self::field_input);

        let inputs: Vec<PageInput> = match self.operation() {
            Operation::Create => payload().collect(),
            Operation::Update => target.map(Self::where_input).into_iter().chain(payload()).collect(),
            Operation::Get | Operation::Destroy => target.map(Self::where_input).into_iter().collect(),
        };

        let handler_name = self.handler_name();
        json!({
            "table": self.handle,
            "pascal": self.pascal,
            "schema_import": self.settings.schema_import,
            "actions_import": self.settings.actions_import,
            "ui_import": self.settings.ui_import,
            "component_name": format!("{}Page", self.pascal),
            "title": self.title(),
            "form_action": format!("{{{handler_name}}}"),
            "handler_name": handler_name,
            "has_multiline": inputs.iter().any(|input| input.multiline),
            "inputs": inputs,
        })
    }
}

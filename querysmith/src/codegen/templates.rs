//! Embedded artifact templates
//!
//! Templates are minijinja sources compiled once into a [`TemplateRegistry`].
//! Block tags sit on their own lines; `trim_blocks` and `lstrip_blocks` keep
//! them out of the output, and the trailing newline of each template is
//! preserved.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use super::ArtifactKind;
use crate::error::Result;

/// Inline call chain
pub const INLINE_TEMPLATE: &str = r"// Generated CRUD operation
const {{ table }}Crud = CrudAbstractions({{ table }})

{{ comment }}
const {{ binding }} = await {{ table }}Crud.{{ call }}
{% for line in chain %}
  {{ line }}
{% endfor %}
";

/// Standalone async function
pub const FUNCTION_TEMPLATE: &str = r"// CRUD Function
async function {{ function_name }}({{ params }}) {
  const {{ table }}Crud = CrudAbstractions({{ table }})

  const {{ binding }} = await {{ table }}Crud.{{ call }}
{% for line in chain %}
    {{ line }}
{% endfor %}

  return {{ binding }}
}
";

/// Server action wrapping the standalone function
pub const ACTION_TEMPLATE: &str = r"'use server'

import { db } from '{{ db_import }}'
import { {{ table }} } from '{{ schema_import }}'
import { CrudAbstractions } from '{{ crud_import }}'
import { revalidatePath } from 'next/cache'

{{ function_code }}
// Usage in Server Action
export async function {{ handler_name }}(formData: FormData) {
  try {
{% for line in body %}
{{ line }}
{% endfor %}

    revalidatePath('/{{ table }}')
    return { success: true, data: result }
  } catch (error) {
    console.error('Server action error:', error)
    return { success: false, error: 'Failed to {{ token }} {{ table }}' }
  }
}
";

/// Form page scaffold
pub const PAGE_TEMPLATE: &str = r#"import React from 'react'
import { {{ table }} } from '{{ schema_import }}'
import { {{ handler_name }} } from '{{ actions_import }}'
import { Button } from '{{ ui_import }}/button'
import { Card, CardContent, CardHeader, CardTitle } from '{{ ui_import }}/card'
import { Input } from '{{ ui_import }}/input'
import { Label } from '{{ ui_import }}/label'
{% if has_multiline %}
import { Textarea } from '{{ ui_import }}/textarea'
{% endif %}

export default function {{ component_name }}() {
  return (
    <div className="container mx-auto p-6">
      <Card>
        <CardHeader>
          <CardTitle>{{ title }}</CardTitle>
        </CardHeader>
        <CardContent>
          <form action={{ form_action }}>
{% for input in inputs %}
            <div className="space-y-2">
              <Label htmlFor="{{ input.name }}">{{ input.label }}</Label>
{% if input.multiline %}
              <Textarea
                id="{{ input.name }}"
                name="{{ input.name }}"
{% else %}
              <Input
                id="{{ input.name }}"
                name="{{ input.name }}"
                type="{{ input.kind }}"
{% endif %}
{% if input.required %}
                required
{% endif %}
              />
            </div>
{% endfor %}

            <Button type="submit" className="mt-4">
              {{ title }}
            </Button>
          </form>
        </CardContent>
      </Card>
    </div>
  )
}

// Type definitions
type {{ pascal }}Type = typeof {{ table }}.$inferSelect
"#;

/// Compiled artifact templates
#[derive(Debug)]
pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl TemplateRegistry {
    /// Compile all embedded templates
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to compile
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        for kind in ArtifactKind::ALL {
            env.add_template(kind.template_name(), Self::source(kind))?;
        }

        Ok(Self { env })
    }

    /// Render one artifact template
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails
    pub fn render<S: Serialize>(&self, kind: ArtifactKind, context: S) -> Result<String> {
        let template = self.env.get_template(kind.template_name())?;
        Ok(template.render(context)?)
    }

    const fn source(kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::InlineExpression => INLINE_TEMPLATE,
            ArtifactKind::StandaloneFunction => FUNCTION_TEMPLATE,
            ArtifactKind::ActionHandler => ACTION_TEMPLATE,
            ArtifactKind::PageComponent => PAGE_TEMPLATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_templates_compile() {
        assert!(TemplateRegistry::new().is_ok());
    }

    #[test]
    fn test_block_lines_leave_no_trace() {
        let registry = TemplateRegistry::new().unwrap();
        let out = registry
            .render(
                ArtifactKind::InlineExpression,
                json!({
                    "table": "users",
                    "comment": "// Read records",
                    "binding": "records",
                    "call": "get(\"All\")",
                    "chain": [".Limit(3)", ".run()"],
                }),
            )
            .unwrap();

        assert_eq!(
            out,
            "// Generated CRUD operation\n\
             const usersCrud = CrudAbstractions(users)\n\
             \n\
             // Read records\n\
             const records = await usersCrud.get(\"All\")\n  \
             .Limit(3)\n  \
             .run()\n"
        );
    }
}

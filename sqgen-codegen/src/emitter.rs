//! Binds a loaded schema to a template catalog.

use crate::catalog::{ArtifactScope, RenderContext, TemplateCatalog};
use crate::cpp::CppOptions;
use crate::error::CodegenError;
use sqgen_schema::{ResolvedType, Schema, SchemaIr};

/// Renders catalog templates against one schema.
pub struct Emitter<'a> {
    schema: &'a Schema,
    catalog: &'a TemplateCatalog,
    options: &'a CppOptions,
    ir: SchemaIr,
}

impl<'a> Emitter<'a> {
    /// Creates a new emitter.
    #[must_use]
    pub fn new(schema: &'a Schema, catalog: &'a TemplateCatalog, options: &'a CppOptions) -> Self {
        Self {
            ir: SchemaIr::from_schema(schema),
            schema,
            catalog,
            options,
        }
    }

    /// Resolved schema view.
    #[must_use]
    pub fn ir(&self) -> &SchemaIr {
        &self.ir
    }

    /// Resolved types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &ResolvedType> {
        self.ir.types.iter()
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext::for_schema(self.schema, &self.ir, self.options)
    }

    /// Renders a per-type template for `type_name`.
    ///
    /// # Errors
    /// Returns `CodegenError` if the template is unknown, is a whole-schema
    /// template, the type does not exist, or rendering fails.
    pub fn render_type(&self, template: &str, type_name: &str) -> Result<String, CodegenError> {
        if self.catalog.scope(template)? != ArtifactScope::Type {
            return Err(CodegenError::config(format!(
                "template '{template}' renders the whole schema, not a type"
            )));
        }
        let resolved = self.ir.get_type(type_name).ok_or_else(|| {
            CodegenError::template(template, format!("type '{type_name}'"), "no such type in schema")
        })?;
        self.catalog
            .render(template, &self.context().with_target(resolved))
    }

    /// Renders a whole-schema template.
    ///
    /// # Errors
    /// Returns `CodegenError` if the template is unknown, is a per-type
    /// template, or rendering fails.
    pub fn render_schema(&self, template: &str) -> Result<String, CodegenError> {
        if self.catalog.scope(template)? != ArtifactScope::Schema {
            return Err(CodegenError::config(format!(
                "template '{template}' renders one type, not the whole schema"
            )));
        }
        self.catalog.render(template, &self.context())
    }

    /// Renders a per-type template for every type, in declaration order.
    ///
    /// # Errors
    /// Fails on the first type that does not render.
    pub fn render_all(&self, template: &str) -> Result<Vec<(String, String)>, CodegenError> {
        self.types()
            .map(|t| Ok((t.name.clone(), self.render_type(template, &t.name)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqgen_schema::parse_schema;

    const SCHEMA: &str = r#"{
        "primitive_types": [{"name": "PrimitiveBool"}],
        "types": [
            {"name": "SqRoot", "fields": [{"name": "flag", "return_type": "SqBool"}]},
            {"name": "SqBool", "fields": [{"name": "value", "return_type": "PrimitiveBool"}]}
        ],
        "root_type": "SqRoot"
    }"#;

    #[test]
    fn test_render_all_in_declaration_order() {
        let schema = parse_schema(SCHEMA).expect("Failed to parse");
        let catalog = TemplateCatalog::new().unwrap();
        let options = CppOptions::default();
        let emitter = Emitter::new(&schema, &catalog, &options);

        let rendered = emitter.render_all("source").unwrap();
        let names: Vec<_> = rendered.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["SqRoot", "SqBool"]);
        assert!(rendered[1].1.contains("return get_value();"));
    }

    #[test]
    fn test_scope_mismatch() {
        let schema = parse_schema(SCHEMA).expect("Failed to parse");
        let catalog = TemplateCatalog::new().unwrap();
        let options = CppOptions::default();
        let emitter = Emitter::new(&schema, &catalog, &options);

        assert!(matches!(
            emitter.render_schema("header"),
            Err(CodegenError::Config { .. })
        ));
        assert!(matches!(
            emitter.render_type("registry", "SqRoot"),
            Err(CodegenError::Config { .. })
        ));
        assert!(emitter.render_schema("registry").is_ok());
    }

    #[test]
    fn test_unknown_type() {
        let schema = parse_schema(SCHEMA).expect("Failed to parse");
        let catalog = TemplateCatalog::new().unwrap();
        let options = CppOptions::default();
        let emitter = Emitter::new(&schema, &catalog, &options);

        let err = emitter.render_type("header", "SqPath").unwrap_err();
        assert!(err.to_string().contains("type 'SqPath'"));
    }
}

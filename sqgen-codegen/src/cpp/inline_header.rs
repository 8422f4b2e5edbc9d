//! Template definitions generation (`<Type>.gen.inl.h`).
//!
//! The forwarding constructor and the `create` factory are templates, so
//! their definitions must be visible to every includer. They need the
//! complete payload type, which the class declaration only forward declares.

use super::{CppOptions, GeneratedFiles, include_guard, namespace};
use crate::catalog::{ArtifactScope, RenderContext, RenderStrategy};
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use sqgen_schema::ResolvedType;

/// Generator for the template definitions of one field type.
pub struct InlineHeaderGenerator<'a> {
    resolved: &'a ResolvedType,
    options: &'a CppOptions,
    files: GeneratedFiles,
}

impl<'a> InlineHeaderGenerator<'a> {
    /// Creates a new inline header generator.
    #[must_use]
    pub fn new(resolved: &'a ResolvedType, options: &'a CppOptions) -> Self {
        Self {
            files: GeneratedFiles::new(&resolved.name, &resolved.impl_name, options),
            resolved,
            options,
        }
    }

    /// Generates the inline header text.
    #[must_use]
    pub fn generate(&self) -> String {
        let name = &self.resolved.name;
        let mut w = CodeWriter::new();

        include_guard(&mut w, &self.files.inline_header_guard, |w| {
            w.blank();
            w.line(format!("#include \"{}\"", self.files.header_include));
            w.line(format!("#include \"{}\"", self.files.impl_header_include));
            w.blank();
            w.line("#include <memory>");
            w.line("#include <utility>");

            namespace(w, &self.options.namespace, |w| {
                w.blank();
                w.line("template <typename... Ts>");
                w.line(format!("{name}::{name}(Ts&&... args)"));
                w.indent()
                    .line(format!(
                        ": impl_{{std::make_unique<{}>(std::forward<Ts>(args)...)}}",
                        self.resolved.impl_name
                    ))
                    .outdent();
                w.line("{}");
                w.blank();
                w.line("template <typename... Ts>");
                w.line(format!("FieldPtr {name}::create(Ts&&... args)"));
                w.braced("}", |w| {
                    w.line(format!(
                        "return std::make_unique<{name}>(std::forward<Ts>(args)...);"
                    ));
                });
            });
        });
        w.finish()
    }
}

/// Built-in `inline_header` strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineHeaderStrategy;

impl RenderStrategy for InlineHeaderStrategy {
    fn scope(&self) -> ArtifactScope {
        ArtifactScope::Type
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<String, CodegenError> {
        let resolved = ctx.require_target("inline_header")?;
        Ok(InlineHeaderGenerator::new(resolved, ctx.options).generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqgen_schema::{SchemaIr, parse_schema};

    #[test]
    fn test_inline_header() {
        let json = r#"{"types": [{"name": "SqInt", "fields": []}], "root_type": "SqInt"}"#;
        let schema = parse_schema(json).expect("Failed to parse");
        let ir = SchemaIr::from_schema(&schema);
        let text = InlineHeaderGenerator::new(&ir.types[0], &CppOptions::default()).generate();

        assert!(text.starts_with("#ifndef SQ_INCLUDE_GUARD_field_types_SqInt_gen_inl_h_\n"));
        assert!(text.contains(
            "#include \"field_types/SqInt.gen.h\"\n#include \"field_types/SqIntImpl.h\"\n"
        ));
        assert!(text.contains(
            "template <typename... Ts>\nSqInt::SqInt(Ts&&... args)\n    : impl_{std::make_unique<SqIntImpl>(std::forward<Ts>(args)...)}\n{}\n"
        ));
        assert!(text.contains(
            "FieldPtr SqInt::create(Ts&&... args)\n{\n    return std::make_unique<SqInt>(std::forward<Ts>(args)...);\n}\n"
        ));
        assert!(text.ends_with("#endif // SQ_INCLUDE_GUARD_field_types_SqInt_gen_inl_h_\n"));
    }
}

//! Class declaration generation (`<Type>.gen.h`).

use super::{CppOptions, GeneratedFiles, RUNTIME_INCLUDES, doc_comment, include_guard, namespace};
use crate::catalog::{ArtifactScope, RenderContext, RenderStrategy};
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use sqgen_schema::{ResolvedField, ResolvedType};

/// Generator for the class declaration of one field type.
pub struct HeaderGenerator<'a> {
    resolved: &'a ResolvedType,
    options: &'a CppOptions,
    files: GeneratedFiles,
}

impl<'a> HeaderGenerator<'a> {
    /// Creates a new header generator.
    #[must_use]
    pub fn new(resolved: &'a ResolvedType, options: &'a CppOptions) -> Self {
        Self {
            files: GeneratedFiles::new(&resolved.name, &resolved.impl_name, options),
            resolved,
            options,
        }
    }

    /// Generates the header text.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut w = CodeWriter::new();
        include_guard(&mut w, &self.files.header_guard, |w| {
            w.blank();
            for include in RUNTIME_INCLUDES {
                w.line(format!("#include \"{include}\""));
            }
            w.blank();
            w.line("#include <memory>");
            w.line("#include <string_view>");

            namespace(w, &self.options.namespace, |w| {
                w.blank();
                w.line(format!("class {};", self.resolved.impl_name));
                w.blank();
                self.write_class(w);
            });

            w.blank();
            w.line(format!("#include \"{}\"", self.files.inline_header_include));
        });
        w.finish()
    }

    fn write_class(&self, w: &mut CodeWriter) {
        let name = &self.resolved.name;

        doc_comment(w, &self.resolved.doc_lines);
        w.line(format!("class {name}"));
        w.indent().line(": public Field").outdent();
        w.braced("};", |w| {
            w.outdent().line("public:").indent();
            w.line(format!("using ImplPtr = std::unique_ptr<{}>;", self.resolved.impl_name));
            w.blank();

            w.line("template <typename... Ts>");
            w.line(format!("explicit {name}(Ts&&... args);"));
            w.blank();
            w.line("template <typename... Ts>");
            w.line("[[nodiscard]] static FieldPtr create(Ts&&... args);");
            w.blank();

            w.line(format!("{name}(const {name}&) = delete;"));
            w.line(format!("{name}({name}&&) = delete;"));
            w.line(format!("{name}& operator=(const {name}&) = delete;"));
            w.line(format!("{name}& operator=({name}&&) = delete;"));
            w.line(format!("~{name}() noexcept override;"));
            w.blank();

            w.line(
                "[[nodiscard]] Result get(std::string_view member, const FieldCallParams& params) const override;",
            );
            w.line("[[nodiscard]] Primitive to_primitive() const override;");

            for field in &self.resolved.fields {
                w.blank();
                write_getter_decl(w, field);
            }

            w.blank();
            w.outdent().line("private:").indent();
            w.line("ImplPtr impl_;");
        });
    }
}

fn write_getter_decl(w: &mut CodeWriter, field: &ResolvedField) {
    doc_comment(w, &field.doc_lines);
    w.line(format!(
        "[[nodiscard]] Result {}({}) const;",
        field.getter_name,
        field.parameter_list()
    ));
}

/// Built-in `header` strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderStrategy;

impl RenderStrategy for HeaderStrategy {
    fn scope(&self) -> ArtifactScope {
        ArtifactScope::Type
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<String, CodegenError> {
        let resolved = ctx.require_target("header")?;
        Ok(HeaderGenerator::new(resolved, ctx.options).generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqgen_schema::{SchemaIr, parse_schema};

    fn point_header() -> String {
        let json = r#"{
            "primitive_types": [{"name": "PrimitiveInt"}],
            "types": [{"name": "Point", "doc": "A point.", "fields": [
                {"name": "x", "doc": "X coordinate.", "return_type": "PrimitiveInt"},
                {"name": "scaled", "return_type": "Point", "params": [
                    {"name": "m", "type": "PrimitiveInt", "required": true},
                    {"name": "n", "type": "PrimitiveInt", "required": false}
                ]}
            ]}],
            "root_type": "Point"
        }"#;
        let schema = parse_schema(json).expect("Failed to parse");
        let ir = SchemaIr::from_schema(&schema);
        HeaderGenerator::new(&ir.types[0], &CppOptions::default()).generate()
    }

    #[test]
    fn test_header_guard_and_includes() {
        let header = point_header();
        assert!(header.starts_with(
            "#ifndef SQ_INCLUDE_GUARD_field_types_Point_gen_h_\n#define SQ_INCLUDE_GUARD_field_types_Point_gen_h_\n"
        ));
        assert!(header.ends_with("#endif // SQ_INCLUDE_GUARD_field_types_Point_gen_h_\n"));
        assert!(header.contains("#include \"field_types/FieldCallParams.h\"\n"));
        assert!(header.contains("#include \"field_types/Point.gen.inl.h\"\n"));
    }

    #[test]
    fn test_class_declaration() {
        let header = point_header();
        assert!(header.contains("namespace sq::field_types {\n"));
        assert!(header.contains("class PointImpl;\n"));
        assert!(header.contains("/**\n * A point.\n */\nclass Point\n    : public Field\n{\npublic:\n"));
        assert!(header.contains("    using ImplPtr = std::unique_ptr<PointImpl>;\n"));
        assert!(header.contains("    explicit Point(Ts&&... args);\n"));
        assert!(header.contains("    [[nodiscard]] static FieldPtr create(Ts&&... args);\n"));
        assert!(header.contains("    ~Point() noexcept override;\n"));
        assert!(header.contains("private:\n    ImplPtr impl_;\n};\n"));
    }

    #[test]
    fn test_one_getter_per_field() {
        let header = point_header();
        assert!(header.contains("    /**\n     * X coordinate.\n     */\n    [[nodiscard]] Result get_x() const;\n"));
        assert!(header.contains(
            "    [[nodiscard]] Result get_scaled(const PrimitiveInt& m, const PrimitiveInt* n) const;\n"
        ));
        assert_eq!(header.matches("[[nodiscard]] Result get_").count(), 2);
    }

    #[test]
    fn test_doc_with_comment_terminator() {
        let json = r#"{
            "primitive_types": [{"name": "PrimitiveInt"}],
            "types": [{"name": "Point", "fields": [
                {"name": "ratio", "doc": "Ratio a*/b of the point.", "return_type": "PrimitiveInt"}
            ]}],
            "root_type": "Point"
        }"#;
        let schema = parse_schema(json).expect("Failed to parse");
        let ir = SchemaIr::from_schema(&schema);
        let header = HeaderGenerator::new(&ir.types[0], &CppOptions::default()).generate();

        assert!(header.contains("     * Ratio a*\\/b of the point.\n"));
        assert!(!header.contains("a*/b"));
        assert_eq!(header.matches("*/").count(), header.matches("/**").count());
    }

    #[test]
    fn test_custom_namespace() {
        let json = r#"{"types": [{"name": "Empty", "fields": []}], "root_type": "Empty"}"#;
        let schema = parse_schema(json).expect("Failed to parse");
        let ir = SchemaIr::from_schema(&schema);
        let options = CppOptions {
            namespace: "app::fields".to_string(),
            ..CppOptions::default()
        };
        let header = HeaderGenerator::new(&ir.types[0], &options).generate();
        assert!(header.contains("namespace app::fields {\n"));
        assert!(header.contains("} // namespace app::fields\n"));
        assert!(!header.contains("Result get_"));
    }
}

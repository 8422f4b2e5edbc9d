//! Out-of-line definitions generation (`<Type>.gen.cpp`).
//!
//! Emits the destructor and the `get(member, params)` dispatch cascade.
//! Per-field getters and `to_primitive` are hand-written against the payload.

use super::{CppOptions, GeneratedFiles, INVALID_FIELD_ERROR_INCLUDE, namespace};
use crate::catalog::{ArtifactScope, RenderContext, RenderStrategy};
use crate::dispatch::DispatchTable;
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use sqgen_schema::ResolvedType;

/// Generator for the out-of-line definitions of one field type.
pub struct SourceGenerator<'a> {
    resolved: &'a ResolvedType,
    options: &'a CppOptions,
    files: GeneratedFiles,
    table: DispatchTable,
}

impl<'a> SourceGenerator<'a> {
    /// Creates a new source generator.
    #[must_use]
    pub fn new(resolved: &'a ResolvedType, options: &'a CppOptions) -> Self {
        Self {
            files: GeneratedFiles::new(&resolved.name, &resolved.impl_name, options),
            table: DispatchTable::for_type(resolved),
            resolved,
            options,
        }
    }

    /// Generates the source text.
    #[must_use]
    pub fn generate(&self) -> String {
        let name = &self.resolved.name;
        let mut w = CodeWriter::new();

        w.line(format!("#include \"{}\"", self.files.header_include));
        w.line(format!("#include \"{}\"", self.files.impl_header_include));
        w.blank();
        w.line(format!("#include \"{INVALID_FIELD_ERROR_INCLUDE}\""));
        w.blank();
        w.line("#include <string_view>");

        namespace(&mut w, &self.options.namespace, |w| {
            w.blank();
            w.line(format!("{name}::~{name}() noexcept = default;"));
            w.blank();
            write_dispatch(w, &self.table);
        });
        w.finish()
    }
}

/// Writes the `get(member, params)` definition for `table`.
pub fn write_dispatch(w: &mut CodeWriter, table: &DispatchTable) {
    let unused = if table.uses_params() {
        ""
    } else {
        "[[maybe_unused]] "
    };
    w.line(format!(
        "Result {}::get(std::string_view member, {unused}const FieldCallParams& params) const",
        table.type_name
    ));
    w.braced("}", |w| {
        for branch in &table.branches {
            w.line(format!("if (member == \"{}\")", branch.member));
            w.braced("}", |w| {
                w.line(format!("return {};", branch.call_expression()));
            });
        }
        w.line(format!(
            "throw InvalidFieldError(\"{}\", member);",
            table.type_name
        ));
    });
}

/// Built-in `source` strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceStrategy;

impl RenderStrategy for SourceStrategy {
    fn scope(&self) -> ArtifactScope {
        ArtifactScope::Type
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<String, CodegenError> {
        let resolved = ctx.require_target("source")?;
        Ok(SourceGenerator::new(resolved, ctx.options).generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqgen_schema::{SchemaIr, parse_schema};

    fn generate(json: &str) -> String {
        let schema = parse_schema(json).expect("Failed to parse");
        let ir = SchemaIr::from_schema(&schema);
        SourceGenerator::new(&ir.types[0], &CppOptions::default()).generate()
    }

    #[test]
    fn test_dispatch_cascade() {
        let source = generate(
            r#"{
                "primitive_types": [{"name": "PrimitiveInt"}],
                "types": [{"name": "Point", "fields": [
                    {"name": "x", "return_type": "PrimitiveInt"},
                    {"name": "y", "return_type": "PrimitiveInt"}
                ]}],
                "root_type": "Point"
            }"#,
        );
        let expected = "\
Result Point::get(std::string_view member, [[maybe_unused]] const FieldCallParams& params) const
{
    if (member == \"x\")
    {
        return get_x();
    }
    if (member == \"y\")
    {
        return get_y();
    }
    throw InvalidFieldError(\"Point\", member);
}
";
        assert!(source.contains(expected), "{source}");
        assert!(source.contains("Point::~Point() noexcept = default;\n"));
        assert!(source.starts_with(
            "#include \"field_types/Point.gen.h\"\n#include \"field_types/PointImpl.h\"\n"
        ));
    }

    #[test]
    fn test_params_are_forwarded() {
        let source = generate(
            r#"{
                "primitive_types": [{"name": "PrimitiveInt"}],
                "types": [{"name": "SqRoot", "fields": [
                    {"name": "ints", "return_type": "PrimitiveInt", "return_list": true, "params": [
                        {"name": "m", "type": "PrimitiveInt", "required": true},
                        {"name": "n", "type": "PrimitiveInt", "required": false}
                    ]}
                ]}],
                "root_type": "SqRoot"
            }"#,
        );
        assert!(source.contains(
            "Result SqRoot::get(std::string_view member, const FieldCallParams& params) const\n"
        ));
        assert!(source.contains(
            "        return get_ints(params.get<PrimitiveInt>(0, \"m\"), params.get_optional<PrimitiveInt>(1, \"n\"));\n"
        ));
    }

    #[test]
    fn test_type_without_fields_always_throws() {
        let source = generate(r#"{"types": [{"name": "Empty", "fields": []}], "root_type": "Empty"}"#);
        assert!(source.contains("{\n    throw InvalidFieldError(\"Empty\", member);\n}\n"));
        assert!(!source.contains("if (member"));
    }
}

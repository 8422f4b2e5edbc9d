//! Intermediate representation for code generation.
//!
//! This module provides a resolved view of the schema with every generated
//! name and C++ spelling computed once, so that programmatic and templated
//! renderers agree on them.

use crate::fields::{FieldDef, ParamDef};
use crate::types::{Schema, TypeDef};
use serde::Serialize;
use serde_json::Value;

/// Intermediate representation of a schema for code generation.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaIr {
    /// Root type name.
    pub root_type: String,
    /// Primitive type names, in declaration order.
    pub primitive_types: Vec<String>,
    /// Resolved field types, in declaration order.
    pub types: Vec<ResolvedType>,
}

impl SchemaIr {
    /// Creates an intermediate representation from a validated schema.
    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            root_type: schema.root_type.clone(),
            primitive_types: schema
                .primitive_types
                .iter()
                .map(|p| p.name.clone())
                .collect(),
            types: schema.types.iter().map(ResolvedType::from_type_def).collect(),
        }
    }

    /// Gets a resolved type by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&ResolvedType> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// Resolved field type information.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedType {
    /// Type name (also the generated class name).
    pub name: String,
    /// Name of the hand-written payload class.
    pub impl_name: String,
    /// Documentation split into lines.
    pub doc_lines: Vec<String>,
    /// Whether any field takes params.
    pub has_params: bool,
    /// Fields in declaration order.
    pub fields: Vec<ResolvedField>,
}

impl ResolvedType {
    /// Creates a resolved type from a type definition.
    #[must_use]
    pub fn from_type_def(type_def: &TypeDef) -> Self {
        Self {
            name: type_def.name.clone(),
            impl_name: format!("{}Impl", type_def.name),
            doc_lines: doc_lines(&type_def.doc),
            has_params: type_def.has_params(),
            fields: type_def
                .fields
                .iter()
                .map(ResolvedField::from_field_def)
                .collect(),
        }
    }
}

/// Resolved field information.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedField {
    /// Field name, matched against the requested member.
    pub name: String,
    /// Name of the per-field getter.
    pub getter_name: String,
    /// Documentation split into lines.
    pub doc_lines: Vec<String>,
    /// Returned type name.
    pub return_type: String,
    /// Whether a sequence is returned.
    pub return_list: bool,
    /// Whether no value may be returned.
    pub nullable: bool,
    /// Params in declaration order.
    pub params: Vec<ResolvedParam>,
}

impl ResolvedField {
    /// Creates a resolved field from a field definition.
    #[must_use]
    pub fn from_field_def(field: &FieldDef) -> Self {
        Self {
            name: field.name.clone(),
            getter_name: getter_name(&field.name),
            doc_lines: doc_lines(&field.doc),
            return_type: field.return_type.clone(),
            return_list: field.return_list,
            nullable: field.nullable,
            params: field.params.iter().map(ResolvedParam::from_param_def).collect(),
        }
    }

    /// Returns the getter parameter list, e.g. `const PrimitiveInt& n`.
    #[must_use]
    pub fn parameter_list(&self) -> String {
        self.params
            .iter()
            .map(|p| format!("{} {}", p.cpp_type, p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// How a param reaches the per-field getter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamPassing {
    /// Always present; passed by const reference.
    Required,
    /// Possibly absent; passed as a nullable const pointer.
    Optional,
}

impl ParamPassing {
    /// Derives the passing convention from the `required` flag.
    #[must_use]
    pub const fn from_required(required: bool) -> Self {
        if required {
            Self::Required
        } else {
            Self::Optional
        }
    }

    /// Returns the getter parameter type for a param of type `base`.
    #[must_use]
    pub fn cpp_type(self, base: &str) -> String {
        match self {
            Self::Required => format!("const {base}&"),
            Self::Optional => format!("const {base}*"),
        }
    }

    /// Returns the `FieldCallParams` extractor used for this convention.
    #[must_use]
    pub const fn extractor(self) -> &'static str {
        match self {
            Self::Required => "get",
            Self::Optional => "get_optional",
        }
    }

    /// Returns true for the always-present convention.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

/// Resolved param information.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedParam {
    /// Param name.
    pub name: String,
    /// Param position.
    pub index: usize,
    /// Param type name.
    pub type_name: String,
    /// Whether the param is required.
    pub required: bool,
    /// Passing convention.
    pub passing: ParamPassing,
    /// Getter parameter type.
    pub cpp_type: String,
    /// Extractor method name.
    pub extractor: &'static str,
    /// Documentation split into lines.
    pub doc_lines: Vec<String>,
    /// Default applied by the hand-written getter, for documentation.
    pub default_value: Option<Value>,
    /// Description of the default.
    pub default_value_doc: Option<String>,
}

impl ResolvedParam {
    /// Creates a resolved param from a param definition.
    #[must_use]
    pub fn from_param_def(param: &ParamDef) -> Self {
        let passing = ParamPassing::from_required(param.required);
        Self {
            name: param.name.clone(),
            index: param.index,
            type_name: param.type_name.clone(),
            required: param.required,
            passing,
            cpp_type: passing.cpp_type(&param.type_name),
            extractor: passing.extractor(),
            doc_lines: doc_lines(&param.doc),
            default_value: param.default_value.clone(),
            default_value_doc: param.default_value_doc.clone(),
        }
    }
}

/// Returns the per-field getter name.
#[must_use]
pub fn getter_name(field: &str) -> String {
    format!("get_{field}")
}

/// Splits documentation into lines, dropping a trailing empty line.
#[must_use]
pub fn doc_lines(doc: &str) -> Vec<String> {
    if doc.is_empty() {
        return Vec::new();
    }
    doc.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    fn create_test_ir() -> SchemaIr {
        let json = r#"{
            "primitive_types": [{"name": "PrimitiveInt"}],
            "types": [{"name": "SqRoot", "doc": ["Root", "type"], "fields": [
                {"name": "ints", "return_type": "PrimitiveInt", "return_list": true, "params": [
                    {"name": "m", "type": "PrimitiveInt", "required": true},
                    {"name": "n", "type": "PrimitiveInt", "required": false,
                     "default_value": 4, "default_value_doc": "four"}
                ]},
                {"name": "bool", "return_type": "PrimitiveInt"}
            ]}],
            "root_type": "SqRoot"
        }"#;
        let schema = parse_schema(json).expect("Failed to parse");
        SchemaIr::from_schema(&schema)
    }

    #[test]
    fn test_resolved_names() {
        let ir = create_test_ir();
        let root = ir.get_type("SqRoot").unwrap();

        assert_eq!(root.impl_name, "SqRootImpl");
        assert_eq!(root.doc_lines, vec!["Root", "type"]);
        assert!(root.has_params);
        assert_eq!(root.fields[0].getter_name, "get_ints");
        assert_eq!(root.fields[1].getter_name, "get_bool");
    }

    #[test]
    fn test_param_passing_convention() {
        let ir = create_test_ir();
        let ints = &ir.types[0].fields[0];

        assert_eq!(ints.params[0].passing, ParamPassing::Required);
        assert_eq!(ints.params[0].cpp_type, "const PrimitiveInt&");
        assert_eq!(ints.params[0].extractor, "get");
        assert_eq!(ints.params[1].passing, ParamPassing::Optional);
        assert_eq!(ints.params[1].cpp_type, "const PrimitiveInt*");
        assert_eq!(ints.params[1].extractor, "get_optional");
        assert_eq!(ints.params[1].default_value, Some(Value::from(4)));
        assert_eq!(ints.params[1].default_value_doc.as_deref(), Some("four"));
        assert_eq!(ints.params[0].default_value, None);
        assert_eq!(
            ints.parameter_list(),
            "const PrimitiveInt& m, const PrimitiveInt* n"
        );
    }

    #[test]
    fn test_empty_parameter_list() {
        let ir = create_test_ir();
        assert_eq!(ir.types[0].fields[1].parameter_list(), "");
    }

    #[test]
    fn test_doc_lines() {
        assert!(doc_lines("").is_empty());
        assert_eq!(doc_lines("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_passing_serializes_snake_case() {
        let json = serde_json::to_value(ParamPassing::Optional).unwrap();
        assert_eq!(json, "optional");
    }
}

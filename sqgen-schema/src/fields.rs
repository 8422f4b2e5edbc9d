//! Field and param definitions.
//!
//! A field is a named accessor on a field type; its params are the arguments
//! a caller may pass when accessing it.

use serde::Serialize;

/// Field definition within a field type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Documentation.
    pub doc: String,
    /// Returned type name (primitive or field type).
    pub return_type: String,
    /// Whether the field returns a sequence.
    pub return_list: bool,
    /// Whether the field may yield no value.
    #[serde(rename = "null")]
    pub nullable: bool,
    /// Params in declaration order.
    pub params: Vec<ParamDef>,
}

impl FieldDef {
    /// Creates a new field definition.
    #[must_use]
    pub fn new(name: String, return_type: String) -> Self {
        Self {
            name,
            doc: String::new(),
            return_type,
            return_list: false,
            nullable: false,
            params: Vec::new(),
        }
    }

    /// Adds a param to the field.
    pub fn add_param(&mut self, param: ParamDef) {
        self.params.push(param);
    }
}

/// Param definition within a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDef {
    /// Param name.
    pub name: String,
    /// Documentation.
    pub doc: String,
    /// Position of the param, starting at 0.
    pub index: usize,
    /// Param type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the caller must supply the param.
    pub required: bool,
    /// Value used when an optional param is omitted.
    pub default_value: Option<serde_json::Value>,
    /// Description of the default behavior.
    pub default_value_doc: Option<String>,
}

impl ParamDef {
    /// Creates a new param definition.
    #[must_use]
    pub fn new(name: String, index: usize, type_name: String, required: bool) -> Self {
        Self {
            name,
            doc: String::new(),
            index,
            type_name,
            required,
            default_value: None,
            default_value_doc: None,
        }
    }

    /// Returns true if any default metadata is present.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default_value.is_some() || self.default_value_doc.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_default_detection() {
        let mut param = ParamDef::new("n".to_string(), 0, "PrimitiveInt".to_string(), false);
        assert!(!param.has_default());
        param.default_value_doc = Some("all of them".to_string());
        assert!(param.has_default());
    }

    #[test]
    fn test_field_serializes_nullable_as_null_key() {
        let mut field = FieldDef::new("parent".to_string(), "Path".to_string());
        field.nullable = true;
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["null"], true);
        assert!(json.get("nullable").is_none());
    }
}

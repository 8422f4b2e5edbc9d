//! Schema validation utilities.
//!
//! This module checks a parsed schema for consistency: unique names,
//! resolvable type references, param positions and the root type.

use crate::error::SchemaError;
use crate::fields::{FieldDef, ParamDef};
use crate::types::{Schema, TypeDef};
use std::collections::HashSet;

/// Validates a parsed schema for correctness.
///
/// # Errors
/// Returns `SchemaError` naming the first offending entity.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaError> {
    validate_primitive_types(schema)?;
    validate_types(schema)?;

    if !schema.has_type(&schema.root_type) {
        return Err(SchemaError::UnknownRootType {
            name: schema.root_type.clone(),
        });
    }

    Ok(())
}

/// Returns true if `name` can be used verbatim as a generated identifier.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn validate_primitive_types(schema: &Schema) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for primitive in &schema.primitive_types {
        if !seen.insert(primitive.name.as_str()) {
            return Err(SchemaError::duplicate(
                "primitive type",
                &primitive.name,
                "schema",
            ));
        }
    }

    Ok(())
}

fn validate_types(schema: &Schema) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for type_def in &schema.types {
        let entity = format!("type '{}'", type_def.name);
        check_identifier(&entity, &type_def.name)?;

        if !seen.insert(type_def.name.as_str()) {
            return Err(SchemaError::duplicate("type", &type_def.name, "schema"));
        }
        if schema.has_primitive_type(&type_def.name) {
            return Err(SchemaError::duplicate(
                "type",
                &type_def.name,
                "schema (already a primitive type)",
            ));
        }

        validate_fields(schema, type_def, &entity)?;
    }

    Ok(())
}

fn validate_fields(schema: &Schema, type_def: &TypeDef, parent: &str) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for field in &type_def.fields {
        let entity = format!("{parent} field '{}'", field.name);
        check_identifier(&entity, &field.name)?;

        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::duplicate("field", &field.name, parent));
        }
        if schema.reference_kind(&field.return_type).is_none() {
            return Err(SchemaError::unknown_type(&field.return_type, entity));
        }

        validate_params(schema, field, &entity)?;
    }

    Ok(())
}

fn validate_params(schema: &Schema, field: &FieldDef, parent: &str) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for (position, param) in field.params.iter().enumerate() {
        let entity = format!("{parent} param '{}'", param.name);
        check_identifier(&entity, &param.name)?;

        if !seen.insert(param.name.as_str()) {
            return Err(SchemaError::duplicate("param", &param.name, parent));
        }
        if param.index != position {
            return Err(SchemaError::IndexMismatch {
                entity,
                declared: param.index,
                position,
            });
        }
        validate_param_default(param, &entity)?;
        if schema.reference_kind(&param.type_name).is_none() {
            return Err(SchemaError::unknown_type(&param.type_name, entity));
        }
    }

    Ok(())
}

fn validate_param_default(param: &ParamDef, entity: &str) -> Result<(), SchemaError> {
    if param.required && param.has_default() {
        return Err(SchemaError::RequiredWithDefault {
            entity: entity.to_string(),
        });
    }
    Ok(())
}

fn check_identifier(entity: &str, name: &str) -> Result<(), SchemaError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier {
            entity: entity.to_string(),
            name: name.to_string(),
        })
    }
}

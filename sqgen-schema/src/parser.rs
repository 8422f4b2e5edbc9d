//! Schema document parser.
//!
//! This module turns a JSON schema document into the internal schema
//! representation. Entities may be listed either as arrays of objects
//! carrying a `name` key or as objects keyed by name; document order is
//! declaration order in both cases.

use crate::document;
use crate::error::{ParseError, SchemaError};
use crate::fields::{FieldDef, ParamDef};
use crate::types::{PrimitiveTypeDef, Schema, TypeDef};
use crate::validation::validate_schema;
use serde_json::{Map, Value};
use std::path::Path;

/// Parses and validates a schema from a JSON string.
///
/// # Errors
/// Returns `SchemaError` if the document is malformed or inconsistent,
/// including a key repeated within one object.
pub fn parse_schema(json: &str) -> Result<Schema, SchemaError> {
    let value = document::from_str(json)?;
    parse_value(&value)
}

/// Reads, parses and validates a schema file.
///
/// # Errors
/// Returns `SchemaError` if the file cannot be read or the schema is invalid.
pub fn load_schema(path: &Path) -> Result<Schema, SchemaError> {
    let json = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_schema(&json)
}

/// Parses and validates a schema from an already decoded JSON value.
///
/// # Errors
/// Returns `SchemaError` if the document is malformed or inconsistent.
pub fn parse_value(value: &Value) -> Result<Schema, SchemaError> {
    let schema = parse_document(value)?;
    validate_schema(&schema)?;
    Ok(schema)
}

/// Parses the top-level document without cross-reference validation.
fn parse_document(value: &Value) -> Result<Schema, ParseError> {
    let root = value
        .as_object()
        .ok_or_else(|| ParseError::InvalidStructure {
            message: "schema document must be a JSON object".to_string(),
        })?;

    let root_type = string_key(root, "schema", "root_type")?;
    let mut schema = Schema::new(root_type);

    if let Some(primitives) = optional(root, "primitive_types") {
        for (position, (key, entry)) in entries(primitives, "schema", "primitive_types")?
            .into_iter()
            .enumerate()
        {
            let entity = format!("primitive_types[{position}]");
            let obj = as_object(entry, &entity)?;
            let name = entity_name(obj, key, &entity)?;
            let doc = doc_key(obj, &format!("primitive type '{name}'"))?;
            schema.add_primitive_type(PrimitiveTypeDef::new(name, doc));
        }
    }

    let types = root
        .get("types")
        .filter(|v| !v.is_null())
        .ok_or_else(|| ParseError::missing_key("schema", "types"))?;
    for (position, (key, entry)) in entries(types, "schema", "types")?.into_iter().enumerate() {
        schema.add_type(parse_type(key, entry, position)?);
    }

    Ok(schema)
}

/// Parses a field type definition.
fn parse_type(key: Option<&str>, value: &Value, position: usize) -> Result<TypeDef, ParseError> {
    let placeholder = format!("types[{position}]");
    let obj = as_object(value, &placeholder)?;
    let name = entity_name(obj, key, &placeholder)?;
    let entity = format!("type '{name}'");

    let mut type_def = TypeDef::new(name, doc_key(obj, &entity)?);

    let fields = obj
        .get("fields")
        .filter(|v| !v.is_null())
        .ok_or_else(|| ParseError::missing_key(&entity, "fields"))?;
    for (position, (key, entry)) in entries(fields, &entity, "fields")?.into_iter().enumerate() {
        type_def.add_field(parse_field(&entity, key, entry, position)?);
    }

    Ok(type_def)
}

/// Parses a field definition.
fn parse_field(
    parent: &str,
    key: Option<&str>,
    value: &Value,
    position: usize,
) -> Result<FieldDef, ParseError> {
    let placeholder = format!("{parent} fields[{position}]");
    let obj = as_object(value, &placeholder)?;
    let name = entity_name(obj, key, &placeholder)?;
    let entity = format!("{parent} field '{name}'");

    let mut field = FieldDef::new(name, string_key(obj, &entity, "return_type")?);
    field.doc = doc_key(obj, &entity)?;
    field.return_list = bool_key_or(obj, &entity, "return_list", false)?;
    field.nullable = bool_key_or(obj, &entity, "null", false)?;

    if let Some(params) = optional(obj, "params") {
        let params = params
            .as_array()
            .ok_or_else(|| ParseError::invalid_value(&entity, "params", "an array"))?;
        for (position, entry) in params.iter().enumerate() {
            field.add_param(parse_param(&entity, entry, position)?);
        }
    }

    Ok(field)
}

/// Parses a param definition.
///
/// A declared `index` is kept as-is; validation checks it against the
/// declaration position.
fn parse_param(parent: &str, value: &Value, position: usize) -> Result<ParamDef, ParseError> {
    let placeholder = format!("{parent} params[{position}]");
    let obj = as_object(value, &placeholder)?;
    let name = entity_name(obj, None, &placeholder)?;
    let entity = format!("{parent} param '{name}'");

    let index = match optional(obj, "index") {
        Some(v) => v
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| ParseError::invalid_value(&entity, "index", "a non-negative integer"))?,
        None => position,
    };
    let type_name = string_key(obj, &entity, "type")?;
    let required = obj
        .get("required")
        .ok_or_else(|| ParseError::missing_key(&entity, "required"))?
        .as_bool()
        .ok_or_else(|| ParseError::invalid_value(&entity, "required", "a boolean"))?;

    let mut param = ParamDef::new(name, index, type_name, required);
    param.doc = doc_key(obj, &entity)?;
    param.default_value = optional(obj, "default_value").cloned();
    param.default_value_doc = match optional(obj, "default_value_doc") {
        Some(v) => Some(doc_value(v, &entity, "default_value_doc")?),
        None => None,
    };

    Ok(param)
}

/// Returns a key's value, treating explicit `null` as absent.
fn optional<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn as_object<'a>(value: &'a Value, entity: &str) -> Result<&'a Map<String, Value>, ParseError> {
    value.as_object().ok_or_else(|| ParseError::InvalidStructure {
        message: format!("{entity} must be a JSON object"),
    })
}

/// Lists the entries of an entity collection.
///
/// Arrays yield unnamed entries; objects yield entries keyed by name.
fn entries<'a>(
    value: &'a Value,
    entity: &str,
    key: &str,
) -> Result<Vec<(Option<&'a str>, &'a Value)>, ParseError> {
    match value {
        Value::Array(items) => Ok(items.iter().map(|v| (None, v)).collect()),
        Value::Object(map) => Ok(map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect()),
        _ => Err(ParseError::invalid_value(
            entity,
            key,
            "an array or an object keyed by name",
        )),
    }
}

/// Resolves an entity name from its `name` key or its collection key.
fn entity_name(
    obj: &Map<String, Value>,
    key: Option<&str>,
    entity: &str,
) -> Result<String, ParseError> {
    match (optional(obj, "name"), key) {
        (Some(name), key) => {
            let name = name
                .as_str()
                .ok_or_else(|| ParseError::invalid_value(entity, "name", "a string"))?;
            if let Some(key) = key.filter(|k| *k != name) {
                return Err(ParseError::invalid_value(
                    entity,
                    "name",
                    format!("'{key}' to match its key"),
                ));
            }
            Ok(name.to_string())
        }
        (None, Some(key)) => Ok(key.to_string()),
        (None, None) => Err(ParseError::missing_key(entity, "name")),
    }
}

fn string_key(obj: &Map<String, Value>, entity: &str, key: &str) -> Result<String, ParseError> {
    optional(obj, key)
        .ok_or_else(|| ParseError::missing_key(entity, key))?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ParseError::invalid_value(entity, key, "a string"))
}

fn bool_key_or(
    obj: &Map<String, Value>,
    entity: &str,
    key: &str,
    default: bool,
) -> Result<bool, ParseError> {
    match optional(obj, key) {
        Some(v) => v
            .as_bool()
            .ok_or_else(|| ParseError::invalid_value(entity, key, "a boolean")),
        None => Ok(default),
    }
}

/// Reads the optional `doc` key, defaulting to an empty string.
fn doc_key(obj: &Map<String, Value>, entity: &str) -> Result<String, ParseError> {
    match optional(obj, "doc") {
        Some(v) => doc_value(v, entity, "doc"),
        None => Ok(String::new()),
    }
}

/// Normalizes a doc value: a string, or an array of lines joined with `\n`.
fn doc_value(value: &Value, entity: &str, key: &str) -> Result<String, ParseError> {
    let expected = || ParseError::invalid_value(entity, key, "a string or an array of strings");
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Array(lines) => lines
            .iter()
            .map(|line| line.as_str().ok_or_else(expected))
            .collect::<Result<Vec<_>, _>>()
            .map(|lines| lines.join("\n")),
        _ => Err(expected()),
    }
}

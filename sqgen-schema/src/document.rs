//! Strict JSON document decoding.
//!
//! `serde_json::Value` keeps the last of repeated object keys, which would
//! silently drop name-keyed types and fields. Documents are decoded here
//! instead, and the first repeated key is reported with the path of the
//! object holding it.

use crate::error::{ParseError, SchemaError};
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};
use std::cell::RefCell;
use std::fmt;

/// A key repeated within one JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    /// Keys and array indexes leading to the object.
    pub path: Vec<String>,
    /// The repeated key.
    pub key: String,
}

impl DuplicateKey {
    /// Entity kind named by the repeated key.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.path
            .last()
            .and_then(|collection| entity_kind(collection))
            .unwrap_or("key")
    }

    /// Human readable location of the object holding the key.
    #[must_use]
    pub fn context(&self) -> String {
        let owner = match self.path.split_last() {
            Some((collection, parent)) if entity_kind(collection).is_some() => parent,
            _ => self.path.as_slice(),
        };
        describe(owner)
    }
}

impl From<DuplicateKey> for SchemaError {
    fn from(duplicate: DuplicateKey) -> Self {
        Self::duplicate(duplicate.kind(), &duplicate.key, duplicate.context())
    }
}

fn entity_kind(collection: &str) -> Option<&'static str> {
    match collection {
        "primitive_types" => Some("primitive type"),
        "types" => Some("type"),
        "fields" => Some("field"),
        "params" => Some("param"),
        _ => None,
    }
}

fn describe(path: &[String]) -> String {
    if path.is_empty() {
        return "schema".to_string();
    }
    let named: Option<Vec<String>> = path
        .chunks(2)
        .map(|pair| match pair {
            [collection, name] if !name.bytes().all(|b| b.is_ascii_digit()) => {
                entity_kind(collection).map(|kind| format!("{kind} '{name}'"))
            }
            _ => None,
        })
        .collect();
    named.map_or_else(|| format!("'/{}'", path.join("/")), |parts| parts.join(" "))
}

/// Decodes a JSON document, rejecting objects with repeated keys.
///
/// # Errors
/// Returns `SchemaError::DuplicateDefinition` for a repeated key, or
/// `ParseError::Json` if the text is not valid JSON.
pub fn from_str(json: &str) -> Result<Value, SchemaError> {
    let found = RefCell::new(None);
    let mut de = serde_json::Deserializer::from_str(json);
    let result = Scan {
        path: Vec::new(),
        found: &found,
    }
    .deserialize(&mut de)
    .and_then(|value| de.end().map(|()| value));

    match (result, found.into_inner()) {
        (_, Some(duplicate)) => Err(duplicate.into()),
        (Ok(value), None) => Ok(value),
        (Err(err), None) => Err(ParseError::Json(err).into()),
    }
}

struct Scan<'a> {
    path: Vec<String>,
    found: &'a RefCell<Option<DuplicateKey>>,
}

impl<'a> Scan<'a> {
    fn child(&self, segment: String) -> Scan<'a> {
        let mut path = self.path.clone();
        path.push(segment);
        Scan {
            path,
            found: self.found,
        }
    }
}

impl<'de> DeserializeSeed<'de> for Scan<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Scan<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any valid JSON value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Value, E> {
        Ok(Value::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Value, E> {
        Ok(Value::Number(value.into()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Value, E> {
        Ok(Value::Number(value.into()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Value, E> {
        Ok(Number::from_f64(value).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Value, E> {
        Ok(Value::String(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Value, E> {
        Ok(Value::String(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        DeserializeSeed::deserialize(self, deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(self.child(items.len().to_string()))? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut object = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            if object.contains_key(&key) {
                let message = format!("duplicate key '{key}'");
                *self.found.borrow_mut() = Some(DuplicateKey {
                    path: self.path,
                    key,
                });
                return Err(de::Error::custom(message));
            }
            let value = map.next_value_seed(self.child(key.clone()))?;
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duplicate_of(json: &str) -> (String, String, String) {
        match from_str(json).unwrap_err() {
            SchemaError::DuplicateDefinition {
                kind,
                name,
                context,
            } => (kind, name, context),
            other => panic!("expected a duplicate definition, got {other:?}"),
        }
    }

    #[test]
    fn test_decodes_like_value() {
        let json = r#"{"b": [1, -2, 2.5, "s", true, null], "a": {"c": {}}}"#;
        let value = from_str(json).unwrap();
        assert_eq!(value, serde_json::from_str::<Value>(json).unwrap());
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_repeated_keyed_type() {
        let (kind, name, context) =
            duplicate_of(r#"{"types": {"Point": {"fields": {}}, "Point": {"fields": {}}}}"#);
        assert_eq!(kind, "type");
        assert_eq!(name, "Point");
        assert_eq!(context, "schema");
    }

    #[test]
    fn test_repeated_keyed_field() {
        let (kind, name, context) = duplicate_of(
            r#"{"types": {"Point": {"fields": {"x": {}, "x": {"return_type": "Point"}}}}}"#,
        );
        assert_eq!((kind.as_str(), name.as_str()), ("field", "x"));
        assert_eq!(context, "type 'Point'");
    }

    #[test]
    fn test_repeated_plain_key_in_array_entry() {
        let (kind, name, context) =
            duplicate_of(r#"{"types": [{"name": "Point", "doc": "a", "doc": "b"}]}"#);
        assert_eq!((kind.as_str(), name.as_str()), ("key", "doc"));
        assert_eq!(context, "'/types/0'");
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        assert!(matches!(
            from_str(r#"{"a": 1"#),
            Err(SchemaError::Parse(ParseError::Json(_)))
        ));
        assert!(matches!(
            from_str(r#"{"a": 1} trailing"#),
            Err(SchemaError::Parse(ParseError::Json(_)))
        ));
    }
}

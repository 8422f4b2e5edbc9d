//! Error types for schema parsing and validation.

use thiserror::Error;

/// Error type for schema parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read the schema document.
    #[error("failed to read schema '{path}': {source}")]
    Io {
        /// Path of the schema document.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Missing required key.
    #[error("missing required key '{key}' on {entity}")]
    MissingKey {
        /// Entity the key belongs to.
        entity: String,
        /// Key name.
        key: String,
    },

    /// Key present but holding the wrong kind of value.
    #[error("invalid value for key '{key}' on {entity}: expected {expected}")]
    InvalidValue {
        /// Entity the key belongs to.
        entity: String,
        /// Key name.
        key: String,
        /// Description of the expected value.
        expected: String,
    },

    /// Invalid schema structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },
}

/// Error type for schema loading and validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Duplicate definition.
    #[error("duplicate {kind} definition '{name}' in {context}")]
    DuplicateDefinition {
        /// Kind of definition (type, field, param, ...).
        kind: String,
        /// Name of the duplicate.
        name: String,
        /// Where the duplicate was found.
        context: String,
    },

    /// Unknown type reference.
    #[error("unknown type '{type_name}' referenced by {referenced_by}")]
    UnknownType {
        /// Referenced type name.
        type_name: String,
        /// Entity holding the reference.
        referenced_by: String,
    },

    /// The root type is not a declared type.
    #[error("root type '{name}' is not a declared type")]
    UnknownRootType {
        /// Root type name.
        name: String,
    },

    /// Param index does not match its declaration position.
    #[error("{entity} declares index {declared} but is at position {position}")]
    IndexMismatch {
        /// Offending param.
        entity: String,
        /// Declared index.
        declared: usize,
        /// Declaration position.
        position: usize,
    },

    /// Required param carrying default value metadata.
    #[error("{entity} is required but declares a default value")]
    RequiredWithDefault {
        /// Offending param.
        entity: String,
    },

    /// Name unusable as a generated identifier.
    #[error("invalid identifier '{name}' for {entity}")]
    InvalidIdentifier {
        /// Offending entity.
        entity: String,
        /// Rejected name.
        name: String,
    },
}

impl ParseError {
    /// Creates a missing key error.
    pub fn missing_key(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingKey {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        entity: impl Into<String>,
        key: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            entity: entity.into(),
            key: key.into(),
            expected: expected.into(),
        }
    }
}

impl SchemaError {
    /// Creates a duplicate definition error.
    pub fn duplicate(
        kind: impl Into<String>,
        name: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
            context: context.into(),
        }
    }

    /// Creates an unknown type error.
    pub fn unknown_type(type_name: impl Into<String>, referenced_by: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
            referenced_by: referenced_by.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message_names_entity() {
        let err = ParseError::missing_key("type 'Point' field 'x'", "return_type");
        assert_eq!(
            err.to_string(),
            "missing required key 'return_type' on type 'Point' field 'x'"
        );
    }

    #[test]
    fn test_schema_error_wraps_parse_error() {
        let err: SchemaError = ParseError::missing_key("schema", "types").into();
        assert!(err.to_string().contains("missing required key 'types'"));
    }

    #[test]
    fn test_unknown_type_message() {
        let err = SchemaError::unknown_type("Nope", "type 'Point' field 'x'");
        assert_eq!(
            err.to_string(),
            "unknown type 'Nope' referenced by type 'Point' field 'x'"
        );
    }
}

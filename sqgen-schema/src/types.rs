//! Schema type definitions.
//!
//! This module contains the data structures representing the schema root,
//! primitive types and field types. Field and param definitions live in
//! [`crate::fields`].

use crate::fields::FieldDef;
use serde::Serialize;
use std::collections::HashMap;

/// Complete field type schema.
///
/// Built once by the loader and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    /// Primitive type definitions, in declaration order.
    pub primitive_types: Vec<PrimitiveTypeDef>,
    /// Field type definitions, in declaration order.
    pub types: Vec<TypeDef>,
    /// Name of the type at the root of the object tree.
    pub root_type: String,
    /// Type lookup map (built during parsing).
    #[serde(skip)]
    type_map: HashMap<String, usize>,
}

impl Schema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new(root_type: String) -> Self {
        Self {
            primitive_types: Vec::new(),
            types: Vec::new(),
            root_type,
            type_map: HashMap::new(),
        }
    }

    /// Adds a primitive type definition to the schema.
    pub fn add_primitive_type(&mut self, primitive: PrimitiveTypeDef) {
        self.primitive_types.push(primitive);
    }

    /// Adds a field type definition to the schema.
    pub fn add_type(&mut self, type_def: TypeDef) {
        let index = self.types.len();
        self.type_map.entry(type_def.name.clone()).or_insert(index);
        self.types.push(type_def);
    }

    /// Looks up a field type by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.type_map.get(name).map(|&idx| &self.types[idx])
    }

    /// Checks if a field type exists.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// Checks if a primitive type exists.
    #[must_use]
    pub fn has_primitive_type(&self, name: &str) -> bool {
        self.primitive_types.iter().any(|p| p.name == name)
    }

    /// Classifies a type reference.
    #[must_use]
    pub fn reference_kind(&self, name: &str) -> Option<ReferenceKind> {
        if self.has_primitive_type(name) {
            Some(ReferenceKind::Primitive)
        } else if self.has_type(name) {
            Some(ReferenceKind::Type)
        } else {
            None
        }
    }

    /// Returns the root type definition, if declared.
    #[must_use]
    pub fn root(&self) -> Option<&TypeDef> {
        self.get_type(&self.root_type)
    }

    /// Serializes the normalized schema as a JSON document.
    ///
    /// Docs are single strings and optional default metadata is always
    /// present, `null` when absent.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "primitive_types": self.primitive_types,
            "types": self.types,
            "root_type": self.root_type,
        })
    }
}

/// What a type reference resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A primitive value type.
    Primitive,
    /// A generated field type.
    Type,
}

/// Primitive type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimitiveTypeDef {
    /// Type name as used by the runtime (e.g. `PrimitiveInt`).
    pub name: String,
    /// Documentation.
    pub doc: String,
}

impl PrimitiveTypeDef {
    /// Creates a new primitive type definition.
    #[must_use]
    pub fn new(name: String, doc: String) -> Self {
        Self { name, doc }
    }
}

/// Field type definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDef {
    /// Type name, also the generated class name.
    pub name: String,
    /// Documentation, lines joined with `\n`.
    pub doc: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

impl TypeDef {
    /// Creates a new type definition without fields.
    #[must_use]
    pub fn new(name: String, doc: String) -> Self {
        Self {
            name,
            doc,
            fields: Vec::new(),
        }
    }

    /// Adds a field to the type.
    pub fn add_field(&mut self, field: FieldDef) {
        self.fields.push(field);
    }

    /// Returns true if any field takes parameters.
    #[must_use]
    pub fn has_params(&self) -> bool {
        self.fields.iter().any(|f| !f.params.is_empty())
    }
}

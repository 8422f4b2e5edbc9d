//! # sqgen Schema
//!
//! Field type schema model, loader and validation.
//!
//! This crate provides:
//! - JSON schema document parsing, rejecting repeated keys
//! - Type definitions for primitive types, field types, fields and params
//! - Schema validation
//! - Intermediate representation for code generation

pub mod document;
pub mod error;
pub mod fields;
pub mod ir;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use fields::{FieldDef, ParamDef};
pub use ir::{ParamPassing, ResolvedField, ResolvedParam, ResolvedType, SchemaIr};
pub use parser::{load_schema, parse_schema, parse_value};
pub use types::{PrimitiveTypeDef, ReferenceKind, Schema, TypeDef};

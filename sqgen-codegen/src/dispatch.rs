//! Dispatch cascade model.
//!
//! A [`DispatchTable`] is the structured form of the generated
//! `get(member, params)` function: one branch per field, in declaration
//! order, each forwarding its params through the extractor matching the
//! param's passing convention. Renderers emit text from it; [`DispatchTable::dispatch`]
//! evaluates it against [`CallParams`] with the same semantics as the
//! runtime library the generated code links against.

use serde::Serialize;
use sqgen_schema::{FieldDef, ParamPassing, ResolvedField, ResolvedParam, ResolvedType};
use std::collections::BTreeMap;
use thiserror::Error;

/// Structured dispatch cascade for one field type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchTable {
    /// Field type name, reported by the invalid-field error.
    pub type_name: String,
    /// One branch per field, in declaration order.
    pub branches: Vec<DispatchBranch>,
}

/// One `if (member == "...")` branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchBranch {
    /// Member name matched by the branch.
    pub member: String,
    /// Per-field getter invoked on a match.
    pub getter: String,
    /// Argument extractions, in param order.
    pub arguments: Vec<ArgumentExtraction>,
}

/// Extraction of one argument from the call params.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentExtraction {
    /// Param position.
    pub index: usize,
    /// Param name.
    pub name: String,
    /// Param type name.
    pub type_name: String,
    /// Passing convention.
    pub passing: ParamPassing,
    /// Extractor method name.
    pub extractor: &'static str,
}

impl DispatchTable {
    /// Builds the cascade for a resolved type.
    #[must_use]
    pub fn for_type(resolved: &ResolvedType) -> Self {
        Self {
            type_name: resolved.name.clone(),
            branches: resolved.fields.iter().map(DispatchBranch::for_field).collect(),
        }
    }

    /// Returns true if any branch extracts arguments.
    #[must_use]
    pub fn uses_params(&self) -> bool {
        self.branches.iter().any(|b| !b.arguments.is_empty())
    }

    /// Finds the branch matching `member`, first match in declaration order.
    ///
    /// # Errors
    /// Returns `DispatchError::InvalidField` when no field matches.
    pub fn resolve(&self, member: &str) -> Result<&DispatchBranch, DispatchError> {
        self.branches
            .iter()
            .find(|b| b.member == member)
            .ok_or_else(|| DispatchError::InvalidField {
                type_name: self.type_name.clone(),
                member: member.to_string(),
            })
    }

    /// Evaluates the cascade: selects the branch and extracts its arguments.
    ///
    /// # Errors
    /// Returns `DispatchError` for an unknown member or a missing or
    /// mistyped required argument.
    pub fn dispatch<'a>(
        &'a self,
        member: &str,
        params: &'a CallParams,
    ) -> Result<DispatchCall<'a>, DispatchError> {
        let branch = self.resolve(member)?;
        let arguments = branch
            .arguments
            .iter()
            .map(|arg| arg.extract(params))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DispatchCall { branch, arguments })
    }

    /// Re-derives field signatures from the branches.
    #[must_use]
    pub fn field_metadata(&self) -> Vec<FieldSignature> {
        self.branches
            .iter()
            .map(|b| FieldSignature {
                name: b.member.clone(),
                params: b
                    .arguments
                    .iter()
                    .map(|a| (a.name.clone(), a.passing.is_required()))
                    .collect(),
            })
            .collect()
    }
}

impl DispatchBranch {
    fn for_field(field: &ResolvedField) -> Self {
        Self {
            member: field.name.clone(),
            getter: field.getter_name.clone(),
            arguments: field.params.iter().map(ArgumentExtraction::for_param).collect(),
        }
    }

    /// Renders the getter call with its extraction expressions.
    #[must_use]
    pub fn call_expression(&self) -> String {
        let args: Vec<_> = self.arguments.iter().map(ArgumentExtraction::expression).collect();
        format!("{}({})", self.getter, args.join(", "))
    }
}

impl ArgumentExtraction {
    fn for_param(param: &ResolvedParam) -> Self {
        Self {
            index: param.index,
            name: param.name.clone(),
            type_name: param.type_name.clone(),
            passing: param.passing,
            extractor: param.extractor,
        }
    }

    /// Renders the extraction, e.g. `params.get_optional<PrimitiveInt>(0, "n")`.
    #[must_use]
    pub fn expression(&self) -> String {
        format!(
            "params.{}<{}>({}, \"{}\")",
            self.extractor, self.type_name, self.index, self.name
        )
    }

    fn extract<'a>(&self, params: &'a CallParams) -> Result<Option<&'a Primitive>, DispatchError> {
        match self.passing {
            ParamPassing::Required => params.get(self.index, &self.name, &self.type_name).map(Some),
            ParamPassing::Optional => params.get_optional(self.index, &self.name, &self.type_name),
        }
    }
}

/// Result of evaluating the cascade.
#[derive(Debug)]
pub struct DispatchCall<'a> {
    /// Selected branch.
    pub branch: &'a DispatchBranch,
    /// Extracted arguments; `None` for an omitted optional param.
    pub arguments: Vec<Option<&'a Primitive>>,
}

/// Field name plus `(param name, required)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSignature {
    /// Field name.
    pub name: String,
    /// Params as `(name, required)`.
    pub params: Vec<(String, bool)>,
}

impl FieldSignature {
    /// Signature of a schema field.
    #[must_use]
    pub fn from_field_def(field: &FieldDef) -> Self {
        Self {
            name: field.name.clone(),
            params: field
                .params
                .iter()
                .map(|p| (p.name.clone(), p.required))
                .collect(),
        }
    }
}

/// Primitive argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// `PrimitiveString`.
    String(String),
    /// `PrimitiveInt`.
    Int(i64),
    /// `PrimitiveFloat`.
    Float(f64),
    /// `PrimitiveBool`.
    Bool(bool),
}

impl Primitive {
    /// Runtime type name of the value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "PrimitiveString",
            Self::Int(_) => "PrimitiveInt",
            Self::Float(_) => "PrimitiveFloat",
            Self::Bool(_) => "PrimitiveBool",
        }
    }
}

/// Positional and named arguments of one field access.
#[derive(Debug, Clone, Default)]
pub struct CallParams {
    positional: Vec<Primitive>,
    named: BTreeMap<String, Primitive>,
}

impl CallParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn positional(mut self, value: Primitive) -> Self {
        self.positional.push(value);
        self
    }

    /// Adds a named argument.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>, value: Primitive) -> Self {
        self.named.insert(name.into(), value);
        self
    }

    /// Gets a required argument by position, falling back to its name.
    ///
    /// # Errors
    /// `ArgumentMissing` if absent, `ArgumentType` if of another type.
    pub fn get(&self, index: usize, name: &str, type_name: &str) -> Result<&Primitive, DispatchError> {
        let value = self
            .positional
            .get(index)
            .or_else(|| self.named.get(name))
            .ok_or_else(|| DispatchError::ArgumentMissing {
                param: name.to_string(),
                type_name: type_name.to_string(),
            })?;
        if value.type_name() != type_name {
            return Err(DispatchError::ArgumentType {
                param: name.to_string(),
                expected: type_name.to_string(),
                actual: value.type_name().to_string(),
            });
        }
        Ok(value)
    }

    /// Gets an optional argument; `None` when absent.
    ///
    /// # Errors
    /// `ArgumentType` if present but of another type.
    pub fn get_optional(
        &self,
        index: usize,
        name: &str,
        type_name: &str,
    ) -> Result<Option<&Primitive>, DispatchError> {
        match self.get(index, name, type_name) {
            Ok(value) => Ok(Some(value)),
            Err(DispatchError::ArgumentMissing { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Errors raised by the dispatch cascade.
///
/// Dispatch only checks names and primitive kinds. Value ranges are checked
/// by the hand-written getters and runtime extractors, so any `i64` reaches
/// a `PrimitiveInt` param unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No field of the type has the requested name.
    #[error("invalid field '{member}' for type '{type_name}'")]
    InvalidField {
        /// Field type name.
        type_name: String,
        /// Requested member.
        member: String,
    },

    /// A required argument was not supplied.
    #[error("missing argument '{param}' of type {type_name}")]
    ArgumentMissing {
        /// Param name.
        param: String,
        /// Expected type.
        type_name: String,
    },

    /// An argument has the wrong type.
    #[error("argument '{param}' has type {actual}, expected {expected}")]
    ArgumentType {
        /// Param name.
        param: String,
        /// Expected type.
        expected: String,
        /// Supplied type.
        actual: String,
    },
}

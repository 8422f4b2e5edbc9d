//! # sqgen
//!
//! Schema-driven generator for C++ query field types.
//!
//! A JSON schema describes field types, the named fields each type exposes,
//! and the parameters each field accepts. For every type sqgen writes a
//! class declaration, its template definitions and a source file whose
//! `get(member, params)` dispatches a member name to the matching getter.
//! Further artifacts are rendered from Handlebars templates.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sqgen::prelude::*;
//!
//! let config = GenerationConfig::builder("schema.json")
//!     .sources(Path::new("include/field_types"), Path::new("src"))
//!     .build()?;
//! let report = GenerationDriver::new().run(&config)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Schema document loading and validation
//! - [`codegen`] - Dispatch model, templates and the generation driver

pub mod prelude;

/// Schema loading and validation.
pub mod schema {
    pub use sqgen_schema::*;
}

/// Code generation from schemas.
pub mod codegen {
    pub use sqgen_codegen::*;
}

//! # sqgen Codegen
//!
//! C++ field type generation from sqgen schemas.
//!
//! This crate provides:
//! - The structured dispatch cascade and its reference evaluator
//! - Programmatic C++ header and source generation
//! - A template catalog with strict Handlebars templates
//! - Artifact declarations and the one-shot generation driver

pub mod artifact;
pub mod catalog;
pub mod cpp;
pub mod dispatch;
pub mod driver;
pub mod emitter;
pub mod error;
pub mod output;
pub mod writer;

pub use artifact::ArtifactSpec;
pub use catalog::{ArtifactScope, RenderContext, RenderStrategy, TemplateCatalog};
pub use cpp::CppOptions;
pub use dispatch::{CallParams, DispatchError, DispatchTable, Primitive};
pub use driver::{GenerationConfig, GenerationConfigBuilder, GenerationDriver, GenerationReport};
pub use emitter::Emitter;
pub use error::CodegenError;
pub use output::OutputWriter;

/// Renders one built-in per-type template from a JSON schema string.
///
/// # Arguments
/// * `json` - Schema document content
/// * `template` - Catalog template name, e.g. `"source"`
/// * `type_name` - Field type to render
///
/// # Errors
/// Returns `CodegenError` if parsing, lookup, or rendering fails.
pub fn generate_from_json(
    json: &str,
    template: &str,
    type_name: &str,
) -> Result<String, CodegenError> {
    let schema = sqgen_schema::parse_schema(json)?;
    let catalog = TemplateCatalog::new()?;
    let options = CppOptions::default();
    Emitter::new(&schema, &catalog, &options).render_type(template, type_name)
}

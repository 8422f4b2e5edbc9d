//! Prelude module for convenient imports.
//!
//! ```ignore
//! use sqgen::prelude::*;
//! ```

// Schema types
pub use sqgen_schema::{
    FieldDef, ParamDef, ParseError, PrimitiveTypeDef, Schema, SchemaError, SchemaIr, TypeDef,
    load_schema, parse_schema,
};

// Generation
pub use sqgen_codegen::{
    ArtifactScope, ArtifactSpec, CodegenError, CppOptions, Emitter, GenerationConfig,
    GenerationDriver, GenerationReport, RenderContext, RenderStrategy, TemplateCatalog,
};

// Dispatch model
pub use sqgen_codegen::{CallParams, DispatchError, DispatchTable, Primitive};

//! Named render strategies.
//!
//! A [`TemplateCatalog`] maps template names to either a programmatic
//! [`RenderStrategy`] or a Handlebars template. Handlebars templates are
//! rendered in strict mode: referencing data absent from the bound context
//! fails the render instead of emitting blank text.

use crate::cpp::{CppOptions, GeneratedFiles, HeaderStrategy, InlineHeaderStrategy, SourceStrategy};
use crate::dispatch::DispatchTable;
use crate::error::CodegenError;
use handlebars::Handlebars;
use serde::Serialize;
use sqgen_schema::{ResolvedType, Schema, SchemaIr};
use std::collections::BTreeMap;
use std::path::Path;

/// Extension of template files loaded from a directory.
pub const TEMPLATE_EXTENSION: &str = "hbs";

/// Suffix of the file stem marking a whole-schema template (`name.schema.hbs`).
pub const SCHEMA_SCOPE_SUFFIX: &str = ".schema";

/// Whether a template renders once per type or once per schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactScope {
    /// One artifact per field type.
    Type,
    /// One artifact for the whole schema.
    Schema,
}

/// Data bound to one render.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Loaded schema.
    pub schema: &'a Schema,
    /// Resolved view of the schema.
    pub ir: &'a SchemaIr,
    /// C++ naming options.
    pub options: &'a CppOptions,
    /// Type being rendered; `None` for whole-schema artifacts.
    pub target: Option<&'a ResolvedType>,
}

impl<'a> RenderContext<'a> {
    /// Creates a whole-schema context.
    #[must_use]
    pub fn for_schema(schema: &'a Schema, ir: &'a SchemaIr, options: &'a CppOptions) -> Self {
        Self {
            schema,
            ir,
            options,
            target: None,
        }
    }

    /// Returns a copy bound to `target`.
    #[must_use]
    pub fn with_target(self, target: &'a ResolvedType) -> Self {
        Self {
            target: Some(target),
            ..self
        }
    }

    /// Human-readable description of what is rendered.
    #[must_use]
    pub fn label(&self) -> String {
        match self.target {
            Some(t) => format!("type '{}'", t.name),
            None => "schema".to_string(),
        }
    }

    /// Returns the bound type, failing for whole-schema contexts.
    ///
    /// # Errors
    /// Returns `CodegenError::Template` when no type is bound.
    pub fn require_target(&self, template: &str) -> Result<&'a ResolvedType, CodegenError> {
        self.target
            .ok_or_else(|| CodegenError::template(template, self.label(), "no type bound to render"))
    }
}

/// Programmatic renderer for one artifact kind.
pub trait RenderStrategy: Send + Sync {
    /// Scope the strategy renders at.
    fn scope(&self) -> ArtifactScope;

    /// Renders the artifact text.
    ///
    /// # Errors
    /// Returns `CodegenError` if the context lacks required data.
    fn render(&self, ctx: &RenderContext<'_>) -> Result<String, CodegenError>;
}

/// Renders the normalized schema document as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaJsonStrategy;

impl RenderStrategy for SchemaJsonStrategy {
    fn scope(&self) -> ArtifactScope {
        ArtifactScope::Schema
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<String, CodegenError> {
        let mut text = serde_json::to_string_pretty(&ctx.schema.to_json())
            .map_err(|e| CodegenError::template("schema_json", ctx.label(), e.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}

enum Entry {
    Programmatic(Box<dyn RenderStrategy>),
    Declarative(ArtifactScope),
}

impl Entry {
    fn scope(&self) -> ArtifactScope {
        match self {
            Self::Programmatic(strategy) => strategy.scope(),
            Self::Declarative(scope) => *scope,
        }
    }
}

/// Context handed to Handlebars templates.
#[derive(Serialize)]
struct TemplateData<'a> {
    schema: serde_json::Value,
    types: &'a [ResolvedType],
    root_type: &'a str,
    headers: Vec<String>,
    cpp: &'a CppOptions,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    target: Option<&'a ResolvedType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dispatch: Option<DispatchTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<GeneratedFiles>,
}

impl<'a> TemplateData<'a> {
    fn new(ctx: &RenderContext<'a>) -> Self {
        Self {
            schema: ctx.schema.to_json(),
            types: &ctx.ir.types,
            root_type: &ctx.ir.root_type,
            headers: ctx
                .ir
                .types
                .iter()
                .map(|t| ctx.options.include_path(&crate::cpp::header_file(&t.name)))
                .collect(),
            cpp: ctx.options,
            target: ctx.target,
            dispatch: ctx.target.map(DispatchTable::for_type),
            files: ctx
                .target
                .map(|t| GeneratedFiles::new(&t.name, &t.impl_name, ctx.options)),
        }
    }
}

/// Named render strategies available to the generation driver.
pub struct TemplateCatalog {
    entries: BTreeMap<String, Entry>,
    registry: Handlebars<'static>,
}

impl TemplateCatalog {
    /// Creates a catalog with no entries.
    #[must_use]
    pub fn empty() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        Self {
            entries: BTreeMap::new(),
            registry,
        }
    }

    /// Creates a catalog holding the built-in strategies and templates.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidTemplate` if a built-in template does
    /// not compile.
    pub fn new() -> Result<Self, CodegenError> {
        let mut catalog = Self::empty();
        catalog.register_strategy("header", HeaderStrategy);
        catalog.register_strategy("inline_header", InlineHeaderStrategy);
        catalog.register_strategy("source", SourceStrategy);
        catalog.register_strategy("schema_json", SchemaJsonStrategy);
        catalog.register_template(
            "dispatch",
            include_str!("../templates/dispatch.hbs"),
            ArtifactScope::Type,
        )?;
        catalog.register_template(
            "doc",
            include_str!("../templates/doc.hbs"),
            ArtifactScope::Type,
        )?;
        catalog.register_template(
            "registry",
            include_str!("../templates/registry.schema.hbs"),
            ArtifactScope::Schema,
        )?;
        Ok(catalog)
    }

    /// Registers a programmatic strategy, replacing any entry of that name.
    pub fn register_strategy(&mut self, name: &str, strategy: impl RenderStrategy + 'static) {
        self.registry.unregister_template(name);
        self.entries
            .insert(name.to_string(), Entry::Programmatic(Box::new(strategy)));
    }

    /// Registers a Handlebars template, replacing any entry of that name.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidTemplate` if the template does not compile.
    pub fn register_template(
        &mut self,
        name: &str,
        source: &str,
        scope: ArtifactScope,
    ) -> Result<(), CodegenError> {
        self.registry
            .register_template_string(name, source)
            .map_err(|e| CodegenError::InvalidTemplate {
                template: name.to_string(),
                message: e.to_string(),
            })?;
        self.entries
            .insert(name.to_string(), Entry::Declarative(scope));
        Ok(())
    }

    /// Registers every `*.hbs` file in `dir` under its file stem.
    ///
    /// Stems ending in `.schema` register whole-schema templates under the
    /// stem without that suffix. Returns the number of templates loaded.
    ///
    /// # Errors
    /// Returns `CodegenError` if the directory cannot be read or a template
    /// does not compile.
    pub fn load_directory(&mut self, dir: &Path) -> Result<usize, CodegenError> {
        let read_error = |e: std::io::Error| {
            CodegenError::config(format!("cannot read template directory '{}': {e}", dir.display()))
        };
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(TEMPLATE_EXTENSION) {
                paths.push(path);
            }
        }
        // read_dir order is platform dependent
        paths.sort();

        for path in &paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let (name, scope) = match stem.strip_suffix(SCHEMA_SCOPE_SUFFIX) {
                Some(name) => (name, ArtifactScope::Schema),
                None => (stem, ArtifactScope::Type),
            };
            let source = std::fs::read_to_string(path).map_err(read_error)?;
            self.register_template(name, &source, scope)?;
            tracing::debug!("Registered template '{}' from {}", name, path.display());
        }

        Ok(paths.len())
    }

    /// Registered template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the scope of a registered template.
    ///
    /// # Errors
    /// Returns `CodegenError::UnknownTemplate` if no such template exists.
    pub fn scope(&self, name: &str) -> Result<ArtifactScope, CodegenError> {
        self.entry(name).map(Entry::scope)
    }

    /// Renders the named template against `ctx`.
    ///
    /// # Errors
    /// Returns `CodegenError::UnknownTemplate` for an unregistered name and
    /// `CodegenError::Template` if rendering fails.
    pub fn render(&self, name: &str, ctx: &RenderContext<'_>) -> Result<String, CodegenError> {
        match self.entry(name)? {
            Entry::Programmatic(strategy) => strategy.render(ctx),
            Entry::Declarative(_) => self
                .registry
                .render(name, &TemplateData::new(ctx))
                .map_err(|e| CodegenError::template(name, ctx.label(), e.to_string())),
        }
    }

    fn entry(&self, name: &str) -> Result<&Entry, CodegenError> {
        self.entries
            .get(name)
            .ok_or_else(|| CodegenError::UnknownTemplate {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Debug for TemplateCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateCatalog")
            .field("templates", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

//! One-shot generation runs.

use crate::artifact::ArtifactSpec;
use crate::catalog::{ArtifactScope, TemplateCatalog};
use crate::cpp::CppOptions;
use crate::emitter::Emitter;
use crate::error::CodegenError;
use crate::output::OutputWriter;
use sqgen_schema::load_schema;
use std::path::{Path, PathBuf};

/// Default schema document location.
pub const DEFAULT_SCHEMA_PATH: &str = "schema.json";

/// Settings of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    schema_path: PathBuf,
    artifacts: Vec<ArtifactSpec>,
    template_dir: Option<PathBuf>,
    options: CppOptions,
}

impl GenerationConfig {
    /// Creates a builder reading the schema from `schema_path`.
    #[must_use]
    pub fn builder(schema_path: impl Into<PathBuf>) -> GenerationConfigBuilder {
        GenerationConfigBuilder::new(schema_path)
    }

    /// Schema document location.
    #[must_use]
    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// Artifacts to generate, in order.
    #[must_use]
    pub fn artifacts(&self) -> &[ArtifactSpec] {
        &self.artifacts
    }

    /// Directory of user templates, if any.
    #[must_use]
    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    /// C++ naming options.
    #[must_use]
    pub fn options(&self) -> &CppOptions {
        &self.options
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug, Clone)]
pub struct GenerationConfigBuilder {
    schema_path: PathBuf,
    artifacts: Vec<ArtifactSpec>,
    template_dir: Option<PathBuf>,
    options: CppOptions,
}

impl GenerationConfigBuilder {
    /// Creates a new builder with default options and no artifacts.
    #[must_use]
    pub fn new(schema_path: impl Into<PathBuf>) -> Self {
        Self {
            schema_path: schema_path.into(),
            artifacts: Vec::new(),
            template_dir: None,
            options: CppOptions::default(),
        }
    }

    /// Adds an artifact.
    #[must_use]
    pub fn artifact(mut self, artifact: ArtifactSpec) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Adds the header, inline header and source artifacts.
    #[must_use]
    pub fn sources(self, header_dir: &Path, source_dir: &Path) -> Self {
        self.artifact(ArtifactSpec::header(header_dir))
            .artifact(ArtifactSpec::inline_header(header_dir))
            .artifact(ArtifactSpec::source(source_dir))
    }

    /// Sets the user template directory.
    #[must_use]
    pub fn template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    /// Sets the C++ naming options.
    #[must_use]
    pub fn options(mut self, options: CppOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the namespace of generated classes.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.options.namespace = namespace.into();
        self
    }

    /// Sets the include directory prefix of generated headers.
    #[must_use]
    pub fn include_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.include_prefix = prefix.into();
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// Returns `CodegenError::Config` if no artifact was added.
    pub fn build(self) -> Result<GenerationConfig, CodegenError> {
        if self.artifacts.is_empty() {
            return Err(CodegenError::config("no artifacts to generate"));
        }
        Ok(GenerationConfig {
            schema_path: self.schema_path,
            artifacts: self.artifacts,
            template_dir: self.template_dir,
            options: self.options,
        })
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Written paths, in write order.
    pub written: Vec<PathBuf>,
}

/// Runs generation from a [`GenerationConfig`].
#[derive(Debug, Default)]
pub struct GenerationDriver {
    writer: OutputWriter,
}

impl GenerationDriver {
    /// Creates a new driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the schema and writes every configured artifact.
    ///
    /// Per-type artifacts are written for each type in declaration order,
    /// then whole-schema artifacts once. The run stops at the first failure;
    /// files already written are left in place.
    ///
    /// # Errors
    /// Returns `CodegenError` for invalid configuration, schema errors,
    /// render failures and write failures.
    pub fn run(&self, config: &GenerationConfig) -> Result<GenerationReport, CodegenError> {
        let catalog = self.catalog(config)?;

        let mut per_type = Vec::new();
        let mut per_schema = Vec::new();
        for artifact in config.artifacts() {
            let scope = catalog.scope(&artifact.template)?;
            artifact.validate(scope)?;
            match scope {
                ArtifactScope::Type => per_type.push(artifact),
                ArtifactScope::Schema => per_schema.push(artifact),
            }
        }

        tracing::info!("Loading schema from {}", config.schema_path().display());
        let schema = load_schema(config.schema_path())?;
        if let Some(root) = schema.root() {
            tracing::debug!("Root type '{}' has {} fields", root.name, root.fields.len());
        }
        let emitter = Emitter::new(&schema, &catalog, config.options());

        let mut report = GenerationReport::default();
        for resolved in emitter.types() {
            tracing::debug!("Generating type '{}'", resolved.name);
            for artifact in &per_type {
                let text = emitter.render_type(&artifact.template, &resolved.name)?;
                let path = artifact.resolve_path(Some(&resolved.name));
                self.writer.write(&path, &text)?;
                report.written.push(path);
            }
        }
        for artifact in &per_schema {
            let text = emitter.render_schema(&artifact.template)?;
            let path = artifact.resolve_path(None);
            self.writer.write(&path, &text)?;
            report.written.push(path);
        }

        tracing::info!(
            "Generated {} files for {} types",
            report.written.len(),
            emitter.ir().types.len()
        );
        Ok(report)
    }

    fn catalog(&self, config: &GenerationConfig) -> Result<TemplateCatalog, CodegenError> {
        let mut catalog = TemplateCatalog::new()?;
        if let Some(dir) = config.template_dir() {
            let loaded = catalog.load_directory(dir)?;
            if loaded == 0 {
                tracing::warn!("No templates found in {}", dir.display());
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SCHEMA: &str = r#"{
        "primitive_types": [{"name": "PrimitiveInt"}],
        "types": [
            {"name": "SqRoot", "fields": [{"name": "count", "return_type": "SqInt"}]},
            {"name": "SqInt", "fields": [{"name": "value", "return_type": "PrimitiveInt"}]}
        ],
        "root_type": "SqRoot"
    }"#;

    fn write_schema(dir: &Path) -> PathBuf {
        let path = dir.join("schema.json");
        fs::write(&path, SCHEMA).unwrap();
        path
    }

    #[test]
    fn test_builder_requires_artifacts() {
        let result = GenerationConfig::builder("schema.json").build();
        assert!(matches!(result, Err(CodegenError::Config { .. })));
    }

    #[test]
    fn test_builder_options() {
        let config = GenerationConfig::builder("s.json")
            .sources(Path::new("inc"), Path::new("src"))
            .namespace("app")
            .include_prefix("gen")
            .build()
            .unwrap();
        assert_eq!(config.artifacts().len(), 3);
        assert_eq!(config.options().namespace, "app");
        assert_eq!(config.options().include_prefix, "gen");
        assert_eq!(config.options().guard_prefix, "SQ_INCLUDE_GUARD");
        assert_eq!(config.schema_path(), Path::new("s.json"));
    }

    #[test]
    fn test_run_writes_in_type_order() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path());
        let inc = dir.path().join("include/field_types");
        let src = dir.path().join("src");
        let config = GenerationConfig::builder(schema)
            .sources(&inc, &src)
            .artifact(ArtifactSpec::templated(
                "registry",
                dir.path().join("registry.h").display().to_string(),
            ))
            .build()
            .unwrap();

        let report = GenerationDriver::new().run(&config).unwrap();
        assert_eq!(
            report.written,
            vec![
                inc.join("SqRoot.gen.h"),
                inc.join("SqRoot.gen.inl.h"),
                src.join("SqRoot.gen.cpp"),
                inc.join("SqInt.gen.h"),
                inc.join("SqInt.gen.inl.h"),
                src.join("SqInt.gen.cpp"),
                dir.path().join("registry.h"),
            ]
        );
        for path in &report.written {
            assert!(path.is_file(), "{}", path.display());
        }
    }

    #[test]
    fn test_bad_pattern_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path());
        let out = dir.path().join("out");
        let config = GenerationConfig::builder(schema)
            .artifact(ArtifactSpec::source(&out))
            .artifact(ArtifactSpec::templated("doc", out.join("doc.md").display().to_string()))
            .build()
            .unwrap();

        let err = GenerationDriver::new().run(&config).unwrap_err();
        assert!(matches!(err, CodegenError::Config { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_unknown_template() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path());
        let config = GenerationConfig::builder(schema)
            .artifact(ArtifactSpec::templated("nope", "%s.txt"))
            .build()
            .unwrap();

        let err = GenerationDriver::new().run(&config).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownTemplate { ref name } if name == "nope"));
    }

    #[test]
    fn test_missing_schema() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::builder(dir.path().join("missing.json"))
            .sources(dir.path(), dir.path())
            .build()
            .unwrap();

        let err = GenerationDriver::new().run(&config).unwrap_err();
        assert!(matches!(err, CodegenError::Schema(_)));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_user_template_directory() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path());
        let templates = dir.path().join("templates");
        fs::create_dir(&templates).unwrap();
        fs::write(
            templates.join("fields.hbs"),
            "{{#each type.fields}}{{name}}\n{{/each}}",
        )
        .unwrap();
        let pattern = dir.path().join("%s.fields").display().to_string();
        let config = GenerationConfig::builder(schema)
            .template_dir(&templates)
            .artifact(ArtifactSpec::templated("fields", pattern))
            .build()
            .unwrap();

        GenerationDriver::new().run(&config).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("SqInt.fields")).unwrap(),
            "value\n"
        );
    }
}

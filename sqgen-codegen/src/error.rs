//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema loading or validation error.
    #[error("schema error: {0}")]
    Schema(#[from] sqgen_schema::SchemaError),

    /// Rendering a template failed.
    #[error("template '{template}' failed for {target}: {message}")]
    Template {
        /// Template name.
        template: String,
        /// What was being rendered (a type, or the whole schema).
        target: String,
        /// Error message.
        message: String,
    },

    /// Template registration failed.
    #[error("invalid template '{template}': {message}")]
    InvalidTemplate {
        /// Template name.
        template: String,
        /// Error message.
        message: String,
    },

    /// No template registered under the requested name.
    #[error("unknown template '{name}'")]
    UnknownTemplate {
        /// Requested template name.
        name: String,
    },

    /// Writing an artifact failed.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// Output path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid generation configuration.
    #[error("invalid configuration: {message}")]
    Config {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a template rendering error.
    pub fn template(
        template: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Template {
            template: template.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error with the given message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a write error for `path`.
    pub fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.display().to_string(),
            source,
        }
    }
}

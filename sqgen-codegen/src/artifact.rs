//! Artifact declarations: which template renders to which path.

use crate::catalog::ArtifactScope;
use crate::cpp::{header_file, inline_header_file, source_file};
use crate::error::CodegenError;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the type name in per-type path patterns.
pub const TYPE_PLACEHOLDER: &str = "%s";

/// One artifact to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// Catalog template name.
    pub template: String,
    /// Output path; per-type patterns contain exactly one `%s`. A literal
    /// `%` is written `%%`.
    pub path_pattern: String,
}

impl ArtifactSpec {
    /// Creates an artifact rendering `template` to `path_pattern`.
    pub fn templated(template: impl Into<String>, path_pattern: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            path_pattern: path_pattern.into(),
        }
    }

    /// Class declarations, `<dir>/<Type>.gen.h`.
    #[must_use]
    pub fn header(dir: &Path) -> Self {
        Self::templated("header", in_dir(dir, &header_file(TYPE_PLACEHOLDER)))
    }

    /// Template definitions, `<dir>/<Type>.gen.inl.h`.
    #[must_use]
    pub fn inline_header(dir: &Path) -> Self {
        Self::templated(
            "inline_header",
            in_dir(dir, &inline_header_file(TYPE_PLACEHOLDER)),
        )
    }

    /// Out-of-line definitions, `<dir>/<Type>.gen.cpp`.
    #[must_use]
    pub fn source(dir: &Path) -> Self {
        Self::templated("source", in_dir(dir, &source_file(TYPE_PLACEHOLDER)))
    }

    /// Checks the path pattern against the template scope.
    ///
    /// # Errors
    /// Returns `CodegenError::Config` if a per-type pattern does not contain
    /// exactly one placeholder, or a whole-schema pattern contains any.
    pub fn validate(&self, scope: ArtifactScope) -> Result<(), CodegenError> {
        let (_, placeholders) = expand(&self.path_pattern, None);
        match scope {
            ArtifactScope::Type if placeholders != 1 => Err(CodegenError::config(format!(
                "output pattern '{}' for per-type template '{}' must contain exactly one '{}', found {}",
                self.path_pattern, self.template, TYPE_PLACEHOLDER, placeholders
            ))),
            ArtifactScope::Schema if placeholders != 0 => Err(CodegenError::config(format!(
                "output pattern '{}' for whole-schema template '{}' must not contain '{}'",
                self.path_pattern, self.template, TYPE_PLACEHOLDER
            ))),
            _ => Ok(()),
        }
    }

    /// Output path for `type_name`, or the pattern itself for whole-schema
    /// artifacts.
    #[must_use]
    pub fn resolve_path(&self, type_name: Option<&str>) -> PathBuf {
        PathBuf::from(expand(&self.path_pattern, type_name).0)
    }
}

/// Expands `%%` to `%` and, when `name` is given, `%s` to `name`.
/// Returns the expansion and the number of `%s` placeholders seen.
fn expand(pattern: &str, name: Option<&str>) -> (String, usize) {
    let mut out = String::with_capacity(pattern.len());
    let mut placeholders = 0;
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') => {
                chars.next();
                placeholders += 1;
                out.push_str(name.unwrap_or(TYPE_PLACEHOLDER));
            }
            _ => out.push('%'),
        }
    }
    (out, placeholders)
}

/// Joins `dir` and `file`, escaping any `%` in the directory.
fn in_dir(dir: &Path, file: &str) -> String {
    let dir = dir.display().to_string().replace('%', "%%");
    Path::new(&dir).join(file).display().to_string()
}

//! C++ code generation modules.
//!
//! Each module renders one per-type artifact programmatically through
//! [`CodeWriter`](crate::writer::CodeWriter).

pub mod header;
pub mod inline_header;
pub mod source;

pub use header::HeaderStrategy;
pub use inline_header::InlineHeaderStrategy;
pub use source::SourceStrategy;

use crate::writer::CodeWriter;
use serde::Serialize;

/// Naming options for generated C++.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CppOptions {
    /// Namespace enclosing the generated classes.
    pub namespace: String,
    /// Directory prefix of generated includes (`<prefix>/<Type>.gen.h`).
    pub include_prefix: String,
    /// Prefix of include guard macros.
    pub guard_prefix: String,
}

impl Default for CppOptions {
    fn default() -> Self {
        Self {
            namespace: "sq::field_types".to_string(),
            include_prefix: "field_types".to_string(),
            guard_prefix: "SQ_INCLUDE_GUARD".to_string(),
        }
    }
}

impl CppOptions {
    /// Include path of a file in the generated include directory.
    #[must_use]
    pub fn include_path(&self, file: &str) -> String {
        if self.include_prefix.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", self.include_prefix, file)
        }
    }

    /// Include guard macro for `file`.
    #[must_use]
    pub fn guard(&self, file: &str) -> String {
        let raw = format!("{}_{}_{}_", self.guard_prefix, self.include_prefix, file);
        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

/// Names and include paths of the files generated for one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFiles {
    /// Class declaration file name.
    pub header: String,
    /// Template definitions file name.
    pub inline_header: String,
    /// Out-of-line definitions file name.
    pub source: String,
    /// Include path of the class declaration.
    pub header_include: String,
    /// Include path of the template definitions.
    pub inline_header_include: String,
    /// Include path of the hand-written payload declaration.
    pub impl_header_include: String,
    /// Include guard of the class declaration.
    pub header_guard: String,
    /// Include guard of the template definitions.
    pub inline_header_guard: String,
}

impl GeneratedFiles {
    /// Computes the file names for `type_name` with payload class `impl_name`.
    #[must_use]
    pub fn new(type_name: &str, impl_name: &str, options: &CppOptions) -> Self {
        let header = header_file(type_name);
        let inline_header = inline_header_file(type_name);
        Self {
            header_include: options.include_path(&header),
            inline_header_include: options.include_path(&inline_header),
            impl_header_include: options.include_path(&impl_header_file(impl_name)),
            header_guard: options.guard(&header),
            inline_header_guard: options.guard(&inline_header),
            source: source_file(type_name),
            header,
            inline_header,
        }
    }
}

/// Runtime library headers every generated declaration depends on.
pub const RUNTIME_INCLUDES: [&str; 3] = [
    "field_types/Field.h",
    "field_types/FieldCallParams.h",
    "field_types/Primitive.h",
];

/// Runtime header declaring the unknown-member error.
pub const INVALID_FIELD_ERROR_INCLUDE: &str = "field_types/InvalidFieldError.h";

/// File name of the generated class declaration.
#[must_use]
pub fn header_file(type_name: &str) -> String {
    format!("{type_name}.gen.h")
}

/// File name of the generated template definitions.
#[must_use]
pub fn inline_header_file(type_name: &str) -> String {
    format!("{type_name}.gen.inl.h")
}

/// File name of the generated out-of-line definitions.
#[must_use]
pub fn source_file(type_name: &str) -> String {
    format!("{type_name}.gen.cpp")
}

/// File name of the hand-written payload declaration.
#[must_use]
pub fn impl_header_file(impl_name: &str) -> String {
    format!("{impl_name}.h")
}

/// Writes `#ifndef`/`#define`, the body, then `#endif`.
pub(crate) fn include_guard(w: &mut CodeWriter, guard: &str, body: impl FnOnce(&mut CodeWriter)) {
    w.line(format!("#ifndef {guard}"));
    w.line(format!("#define {guard}"));
    body(w);
    w.blank();
    w.line(format!("#endif // {guard}"));
}

/// Writes a namespace block surrounded by blank lines.
pub(crate) fn namespace(w: &mut CodeWriter, name: &str, body: impl FnOnce(&mut CodeWriter)) {
    w.blank();
    w.line(format!("namespace {name} {{"));
    body(w);
    w.blank();
    w.line(format!("}} // namespace {name}"));
}

/// Writes a `/** ... */` comment; nothing for empty docs. A `*/` inside a
/// line is written `*\/`.
pub(crate) fn doc_comment(w: &mut CodeWriter, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    w.line("/**");
    for line in lines {
        if line.is_empty() {
            w.line(" *");
        } else {
            w.line(format!(" * {}", line.replace("*/", "*\\/")));
        }
    }
    w.line(" */");
}

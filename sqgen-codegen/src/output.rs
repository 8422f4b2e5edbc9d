//! Artifact writing.

use crate::error::CodegenError;
use std::fs;
use std::path::Path;

/// Writes rendered artifacts to disk, always overwriting.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputWriter;

impl OutputWriter {
    /// Creates a new output writer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Writes `text` to `path`, creating missing parent directories.
    ///
    /// # Errors
    /// Returns `CodegenError::Write` naming the path on any I/O failure.
    pub fn write(&self, path: &Path, text: &str) -> Result<(), CodegenError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CodegenError::write(parent, e))?;
        }
        fs::write(path, text).map_err(|e| CodegenError::write(path, e))?;
        tracing::debug!("Wrote {} ({} bytes)", path.display(), text.len());
        Ok(())
    }
}

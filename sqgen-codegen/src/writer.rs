//! Indentation-tracking text builder for programmatic emission.

const INDENT: &str = "    ";

/// Accumulates generated text line by line at the current indent level.
#[derive(Debug, Default)]
pub struct CodeWriter {
    output: String,
    level: usize,
}

impl CodeWriter {
    /// Creates an empty writer at indent level 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current indent level.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.output.push_str(INDENT);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
        self
    }

    /// Writes an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Increases the indent level.
    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    /// Decreases the indent level, saturating at 0.
    pub fn outdent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    /// Writes `open`, the indented body, then `close`.
    pub fn block(&mut self, open: &str, close: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(open);
        self.indent();
        body(self);
        self.outdent();
        self.line(close)
    }

    /// Writes a `{ ... }` block on its own lines, brace style of the
    /// generated C++.
    pub fn braced(&mut self, close: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.block("{", close, body)
    }

    /// Consumes the writer, returning the text.
    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }
}

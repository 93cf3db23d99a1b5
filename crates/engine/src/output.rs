use std::fmt;

/// Append-only declaration text.
///
/// Lines are only ever appended; nothing already written is rewritten or
/// removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationOutput {
    text: String,
    line_count: usize,
}

impl DeclarationOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line followed by a newline.
    pub fn append_line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
        self.line_count += 1;
    }

    /// Appends every line of `other`.
    pub fn append(&mut self, other: DeclarationOutput) {
        self.text.push_str(&other.text);
        self.line_count += other.line_count;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for DeclarationOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

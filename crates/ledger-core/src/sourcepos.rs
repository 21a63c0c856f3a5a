//! Source positions carried through from the (external) parser into error messages.

use std::fmt;

/// A location in the original ledger text.
///
/// The engine never reads or interprets file paths; it only stores and re-renders whatever
/// position the parser attached, so errors can point a user back at the source line.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct SourcePos {
    /// The file the position is in, if the parser tracked one.
    pub file: Option<String>,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl SourcePos {
    /// Builds a position with no associated file.
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Consuming builder: attaches a file path.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}:{}:{}", self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

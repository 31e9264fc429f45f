use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that abort a render.
///
/// Stage-level problems (an unknown code language, an image without a URL)
/// are never reported here; they are skipped node by node.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The body could not be parsed into a tree.
    #[error("Malformed input at {location}: {message}")]
    MalformedInput {
        /// Parser message
        message: String,
        /// Source location
        location: SourceLocation,
    },
}

impl RenderError {
    /// Create a malformed-input error with location
    pub fn malformed(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::MalformedInput {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }

    /// Location the error points at.
    pub fn location(&self) -> &SourceLocation {
        match self {
            RenderError::MalformedInput { location, .. } => location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location() {
        let err = RenderError::malformed("unexpected `{`", 3, 7);
        assert_eq!(err.to_string(), "Malformed input at 3:7: unexpected `{`");
        assert_eq!(err.location(), &SourceLocation::new(3, 7));
    }
}

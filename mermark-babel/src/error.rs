//! Error types for format operations
//!
//! Conversions themselves never fail: malformed markup degrades to best-effort
//! output. These errors only come from format lookup, unsupported options and
//! internal placeholder bookkeeping.

use std::fmt;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during parsing
    ParseError(String),
    /// Error during serialization
    SerializationError(String),
    /// Format does not support the operation or option
    NotSupported(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            FormatError::NotSupported(msg) => write!(f, "Operation not supported: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = FormatError::FormatNotFound("rtf".to_string());
        assert_eq!(err.to_string(), "Format 'rtf' not found");

        let err = FormatError::NotSupported("option 'x'".to_string());
        assert_eq!(err.to_string(), "Operation not supported: option 'x'");
    }
}

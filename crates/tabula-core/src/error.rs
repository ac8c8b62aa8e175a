//! Error types for tabula-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or mutating containers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A column with this name already exists
    #[error("Column already exists: {0}")]
    DuplicateColumn(String),

    /// Column not found by name or index
    #[error("Column not found: {0}")]
    UnknownColumn(String),

    /// Row index out of bounds
    #[error("Index {index} out of range (len: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Value kind does not match the cell or column kind
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Operation is not available on this container flavour
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A dependency or action callback reported a failure
    #[error("Callback failed: {0}")]
    Callback(String),
}

impl Error {
    /// Create a type mismatch error
    pub fn mismatch(expected: &'static str, actual: &'static str) -> Self {
        Error::TypeMismatch { expected, actual }
    }

    /// Create an unsupported-operation error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Create a callback error with a message
    pub fn callback<S: Into<String>>(msg: S) -> Self {
        Error::Callback(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::DuplicateColumn("price".into()).to_string(),
            "Column already exists: price"
        );
        assert_eq!(
            Error::IndexOutOfRange { index: 3, len: 2 }.to_string(),
            "Index 3 out of range (len: 2)"
        );
        assert_eq!(
            Error::mismatch("integer", "text").to_string(),
            "Type mismatch: expected integer, got text"
        );
    }
}

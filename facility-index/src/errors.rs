//! Error types for facility index operations.
//!
//! Every failure the index can report is a caller error: either a record
//! that cannot be stored, or a query argument that cannot be answered.
//! Neither is retried internally.

use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors that can occur in facility index operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// A record was rejected: coordinates out of range or a duplicate id
    /// within a load batch.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A query or configuration argument was rejected: non-positive radius,
    /// malformed type filter, invalid center, zero limit.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of an [`IndexError`].
///
/// Useful for a serving layer that maps failures to transport status codes
/// without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InvalidArgument,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "Validation error"),
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
        }
    }
}

impl IndexError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        IndexError::Validation(message.into())
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        IndexError::InvalidArgument(message.into())
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IndexError::Validation(_) => ErrorKind::Validation,
            IndexError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Returns the human readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            IndexError::Validation(msg) | IndexError::InvalidArgument(msg) => msg,
        }
    }
}

/// Result type for facility index operations
pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = IndexError::validation("duplicate id 1");
        assert_eq!(err.to_string(), "Validation error: duplicate id 1");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "duplicate id 1");
    }

    #[test]
    fn invalid_argument_display() {
        let err = IndexError::invalid_argument("radius must be positive");
        assert_eq!(err.to_string(), "Invalid argument: radius must be positive");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Validation.to_string(), "Validation error");
        assert_eq!(ErrorKind::InvalidArgument.to_string(), "Invalid argument");
    }

    #[test]
    fn errors_are_comparable() {
        let a = IndexError::validation("x");
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, IndexError::invalid_argument("x"));
    }
}

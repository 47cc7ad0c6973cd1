//! Unified error types for the domain layer
//!
//! Provides a common error type used by record decoding, field coercion and
//! page addressing, so adapters never have to fall back to `String` errors.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Structured user input could not be parsed
    #[error("Parse error in {field}: {message}")]
    Parse {
        field: &'static str,
        message: String,
    },

    /// Unknown sheet field name
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

impl DomainError {
    /// Creates a validation error for violated record invariants.
    ///
    /// # Example
    /// ```ignore
    /// if slug.trim().is_empty() {
    ///     return Err(DomainError::validation("slug cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for a named field.
    ///
    /// The message is kept verbatim so it can be shown to the user as-is.
    pub fn parse(field: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            field,
            message: message.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField(name.into())
    }
}

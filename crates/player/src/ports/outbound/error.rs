//! Error types for port operations.

/// Storage operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record stored under this key.
    #[error("character not found: {slug}")]
    NotFound { slug: String },

    /// Backend call failed - includes operation name for tracing.
    #[error("storage error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Create a NotFound error for a slug.
    pub fn not_found(slug: impl ToString) -> Self {
        Self::NotFound {
            slug: slug.to_string(),
        }
    }

    /// Create a Backend error with operation context.
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        Self::Backend {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err)
    }
}

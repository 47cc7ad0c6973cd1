//! Errors surfaced by sheet saves.

use sheetkeep_domain::DomainError;

use crate::ports::outbound::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The form could not be serialized; the store was not touched.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SaveError {
    /// The message shown to the user for invalid input.
    pub fn input_message(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { message, .. } => Some(message),
            Self::Store(_) => None,
        }
    }
}

impl From<DomainError> for SaveError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Parse { field, message } => Self::InvalidInput { field, message },
            DomainError::UnknownField(name) => Self::InvalidInput {
                field: "field",
                message: format!("unknown field {}", name),
            },
            DomainError::Validation(message) => Self::InvalidInput {
                field: "form",
                message,
            },
        }
    }
}

//! Error types for agenda.

use thiserror::Error;

/// Errors that can occur in agenda operations.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0} is still referenced by activities")]
    InUse(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AgendaError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AgendaError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        AgendaError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether the failure was caused by the request rather than the environment.
    ///
    /// Client errors map to a 4xx-style rejection with no partial result.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AgendaError::Config(_)
                | AgendaError::Storage(_)
                | AgendaError::Io(_)
                | AgendaError::Serialization(_)
        )
    }
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rule_is_client_error() {
        let err = AgendaError::InvalidRule("unknown frequency 'hourly'".into());
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Invalid recurrence rule: unknown frequency 'hourly'"
        );
    }

    #[test]
    fn test_storage_is_not_client_error() {
        assert!(!AgendaError::Storage("disk full".into()).is_client_error());
        let io = std::io::Error::other("boom");
        assert!(!AgendaError::from(io).is_client_error());
    }

    #[test]
    fn test_not_found_message() {
        let err = AgendaError::not_found("Category", 7);
        assert_eq!(err.to_string(), "Category 7 not found");
    }
}

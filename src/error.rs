//! Error types and handling.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name to constraint message, for request validation failures.
pub type FieldErrors = BTreeMap<String, String>;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Record absent, or present but inactive
    #[error("{0}")]
    NotFound(String),

    /// Unique field collision (email)
    #[error("{0}")]
    DuplicateResource(String),

    /// Malformed parameter, unknown sort field, bad page size
    #[error("{0}")]
    Validation(String),

    /// One or more request fields violate their constraints
    #[error("Validation failed: {}", summarize(.0))]
    InvalidFields(FieldErrors),

    /// Anything else that should not leak to callers
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a duplicate resource error with message
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateResource(msg.into())
    }

    /// Create an internal error with message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_fields_display() {
        let mut errors = FieldErrors::new();
        errors.insert("email".to_string(), "Email is required".to_string());
        errors.insert("firstName".to_string(), "First name is required".to_string());

        let err = AppError::InvalidFields(errors);
        assert_eq!(
            err.to_string(),
            "Validation failed: email: Email is required, firstName: First name is required"
        );
    }

    #[test]
    fn test_database_error_conversion() {
        let err: AppError = sea_orm::DbErr::Custom("pool timed out".to_string()).into();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.to_string(), "Database error: Custom Error: pool timed out");
    }
}

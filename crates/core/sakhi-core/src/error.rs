//! Error types for Sakhi core

use thiserror::Error;

/// Main error type for Sakhi operations
#[derive(Debug, Error)]
pub enum SakhiError {
    /// Persistence backend error (custom message)
    #[error("Database error: {0}")]
    Database(String),

    /// Generation backend error
    #[error("Model error: {0}")]
    Model(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),
}

/// Convenient Result type using SakhiError
pub type Result<T> = std::result::Result<T, SakhiError>;

impl SakhiError {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        SakhiError::Database(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        SakhiError::Model(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        SakhiError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        SakhiError::Validation(msg.into())
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        SakhiError::Template(msg.into())
    }

    /// Whether this error came from an external backend call.
    ///
    /// Only these are worth retrying; anything else fails the same way twice.
    pub fn is_external(&self) -> bool {
        matches!(self, SakhiError::Database(_) | SakhiError::Model(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SakhiError::model("quota exceeded");
        assert_eq!(err.to_string(), "Model error: quota exceeded");

        let err = SakhiError::database("relation does not exist");
        assert_eq!(err.to_string(), "Database error: relation does not exist");
    }

    #[test]
    fn test_external_classification() {
        assert!(SakhiError::model("x").is_external());
        assert!(SakhiError::database("x").is_external());
        assert!(!SakhiError::config("x").is_external());
        assert!(!SakhiError::template("x").is_external());
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}

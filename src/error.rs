//! Error types for queryscope.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for queryscope operations.
#[derive(Error, Debug)]
pub enum QueryscopeError {
    /// Database connectivity errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement errors reported by the database during planning or
    /// execution (malformed SQL, unknown table/column, type mismatch).
    #[error("Statement error: {0}")]
    Statement(String),

    /// LLM translation service errors (unreachable, timeout, malformed
    /// response). Only raised on the translation path; the hint path
    /// absorbs these.
    #[error("Translation error: {0}")]
    Translation(String),

    /// The model replied, but no single SQL statement could be extracted
    /// from its output.
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    /// Configuration errors (invalid connection string, missing required
    /// fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryscopeError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a statement error with the given message.
    pub fn statement(msg: impl Into<String>) -> Self {
        Self::Statement(msg.into())
    }

    /// Creates a translation error with the given message.
    pub fn translation(msg: impl Into<String>) -> Self {
        Self::Translation(msg.into())
    }

    /// Creates a malformed-model-output error with the given message.
    pub fn malformed_output(msg: impl Into<String>) -> Self {
        Self::MalformedModelOutput(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Statement(_) => "Statement Error",
            Self::Translation(_) => "Translation Error",
            Self::MalformedModelOutput(_) => "Malformed Model Output",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using QueryscopeError.
pub type Result<T> = std::result::Result<T, QueryscopeError>;

/// Splits a sqlx error into the statement/connectivity taxonomy.
///
/// Errors carrying a database-reported diagnostic become `Statement`;
/// everything else (I/O, TLS, protocol) becomes `Connection`.
pub fn from_sqlx(error: sqlx::Error) -> QueryscopeError {
    match error.as_database_error() {
        Some(db_error) => QueryscopeError::statement(db_error.message().to_string()),
        None => QueryscopeError::connection(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_connection() {
        let err = QueryscopeError::connection("Cannot connect to localhost:5432");
        assert_eq!(
            err.to_string(),
            "Connection error: Cannot connect to localhost:5432"
        );
        assert_eq!(err.category(), "Connection Error");
    }

    #[test]
    fn test_error_display_statement() {
        let err = QueryscopeError::statement("column \"emal\" does not exist");
        assert_eq!(
            err.to_string(),
            "Statement error: column \"emal\" does not exist"
        );
        assert_eq!(err.category(), "Statement Error");
    }

    #[test]
    fn test_error_display_translation() {
        let err = QueryscopeError::translation("request timed out");
        assert_eq!(err.to_string(), "Translation error: request timed out");
        assert_eq!(err.category(), "Translation Error");
    }

    #[test]
    fn test_error_display_malformed_output() {
        let err = QueryscopeError::malformed_output("no SQL statement found");
        assert_eq!(
            err.to_string(),
            "Malformed model output: no SQL statement found"
        );
        assert_eq!(err.category(), "Malformed Model Output");
    }

    #[test]
    fn test_error_display_config() {
        let err = QueryscopeError::config("missing database name");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing database name"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryscopeError>();
    }
}

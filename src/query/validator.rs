//! SQL validation against the database planner.
//!
//! Validation asks the database to plan the statement with `EXPLAIN` and
//! discards the output: a cheap way to surface syntax and semantic
//! errors without executing anything.

use crate::db::ConnectionProvider;
use crate::error::{QueryscopeError, Result};
use crate::llm::HintGenerator;

/// Outcome of validating one SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// True when the database accepted the statement.
    pub success: bool,

    /// Human-readable outcome.
    pub message: String,

    /// Remediation suggestion, present on failure.
    pub hint: Option<String>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            success: true,
            message: "syntax OK".to_string(),
            hint: None,
        }
    }

    fn failed(message: String, hint: String) -> Self {
        Self {
            success: false,
            message,
            hint: Some(hint),
        }
    }
}

/// Validates SQL statements by planning them without execution.
pub struct Validator {
    provider: ConnectionProvider,
    hints: HintGenerator,
}

impl Validator {
    /// Creates a validator over the given provider and hint generator.
    pub fn new(provider: ConnectionProvider, hints: HintGenerator) -> Self {
        Self { provider, hints }
    }

    /// Validates a statement.
    ///
    /// Statement errors reported by the database become a failed
    /// `ValidationResult` carrying the raw error text and a hint.
    /// Connectivity failures are a different condition entirely and
    /// propagate as `Error::Connection` instead of masquerading as
    /// syntax problems.
    pub async fn validate(&self, sql: &str) -> Result<ValidationResult> {
        let mut conn = self.provider.open().await?;

        let result = sqlx::query(&format!("EXPLAIN {sql}"))
            .fetch_all(&mut conn)
            .await;

        ConnectionProvider::close(conn).await;

        match result {
            Ok(_) => Ok(ValidationResult::ok()),
            Err(e) => match e.as_database_error() {
                Some(db_error) => {
                    let raw_error = db_error.message().to_string();
                    let hint = self.hints.suggest_fix(sql, &raw_error).await;
                    Ok(ValidationResult::failed(
                        format!("syntax error: {raw_error}"),
                        hint,
                    ))
                }
                None => Err(QueryscopeError::connection(e.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result_ok_shape() {
        let result = ValidationResult::ok();
        assert!(result.success);
        assert_eq!(result.message, "syntax OK");
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_validation_result_failed_shape() {
        let result = ValidationResult::failed(
            "syntax error: syntax error at or near \"SELEKT\"".to_string(),
            "Did you mean SELECT?".to_string(),
        );
        assert!(!result.success);
        assert!(result.message.contains("syntax error"));
        assert!(result.message.contains("SELEKT"));
        assert_eq!(result.hint.as_deref(), Some("Did you mean SELECT?"));
    }
}

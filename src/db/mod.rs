//! Database access layer for queryscope.
//!
//! Connections are opened fresh for every call and closed before the
//! call returns, on success and on error. There is no pooling; each
//! caller gets a private connection for the duration of one operation.

mod init;
mod schema;
mod types;

pub use init::init_db;
pub use schema::{SchemaIntrospector, SchemaSummary, TableColumns};
pub use types::{ColumnInfo, QueryOutput, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::{QueryscopeError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{Column as SqlxColumn, Connection, PgConnection, Row as SqlxRow, TypeInfo, ValueRef};
use tracing::{debug, warn};
use uuid::Uuid;

/// Opens per-call PostgreSQL connections from an explicit configuration.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    config: ConnectionConfig,
}

impl ConnectionProvider {
    /// Creates a provider for the given connection configuration.
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    /// Opens a fresh connection.
    ///
    /// Callers own the connection and must hand it back to
    /// [`ConnectionProvider::close`] on every exit path.
    pub async fn open(&self) -> Result<PgConnection> {
        let conn_str = self.config.to_connection_string()?;
        debug!("Opening connection to {}", self.config.display_string());

        PgConnection::connect(&conn_str)
            .await
            .map_err(|e| map_connection_error(e, &self.config))
    }

    /// Closes a connection, logging rather than propagating close errors.
    ///
    /// The operation's own result has already been decided by the time a
    /// connection is closed; a failed close must not mask it.
    pub async fn close(conn: PgConnection) {
        if let Err(e) = conn.close().await {
            warn!("Failed to close connection cleanly: {e}");
        }
    }
}

/// Converts a sqlx PgRow to our Row type.
pub(crate) fn convert_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a PgRow to our Value type.
///
/// NULL is decided from the raw wire value before any typed decode, so
/// a decode problem can never be mistaken for NULL: unrecognized or
/// undecodable types render as a `<type>` placeholder instead.
fn convert_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    if let Ok(raw) = row.try_get_raw(index) {
        if raw.is_null() {
            return Value::Null;
        }
    }

    let decoded = match type_name.to_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => row.try_get::<bool, _>(index).map(Value::Bool),

        "INT2" | "SMALLINT" => row.try_get::<i16, _>(index).map(|v| Value::Int(v.into())),
        "INT4" | "INT" | "INTEGER" => row.try_get::<i32, _>(index).map(|v| Value::Int(v.into())),
        "INT8" | "BIGINT" => row.try_get::<i64, _>(index).map(Value::Int),

        "FLOAT4" | "REAL" => row.try_get::<f32, _>(index).map(|v| Value::Float(v.into())),
        "FLOAT8" | "DOUBLE PRECISION" => row.try_get::<f64, _>(index).map(Value::Float),

        "NUMERIC" | "DECIMAL" => row
            .try_get::<Decimal, _>(index)
            .map(|v| Value::String(v.to_string())),

        "TIMESTAMP" => row
            .try_get::<NaiveDateTime, _>(index)
            .map(|v| Value::String(v.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<DateTime<Utc>, _>(index)
            .map(|v| Value::String(v.to_string())),
        "DATE" => row
            .try_get::<NaiveDate, _>(index)
            .map(|v| Value::String(v.to_string())),
        "TIME" => row
            .try_get::<NaiveTime, _>(index)
            .map(|v| Value::String(v.to_string())),

        "UUID" => row
            .try_get::<Uuid, _>(index)
            .map(|v| Value::String(v.to_string())),

        "JSON" | "JSONB" => row
            .try_get::<serde_json::Value, _>(index)
            .map(|v| Value::String(v.to_string())),

        "BYTEA" => row.try_get::<Vec<u8>, _>(index).map(Value::Bytes),

        // Text-like types (TEXT, VARCHAR, CHAR, NAME) decode as strings.
        _ => row.try_get::<String, _>(index).map(Value::String),
    };

    decoded.unwrap_or_else(|e| {
        warn!("Cannot decode column of type {type_name}: {e}");
        Value::String(format!("<{}>", type_name.to_lowercase()))
    })
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> QueryscopeError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.port.unwrap_or(5432);
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        QueryscopeError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
    {
        QueryscopeError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        QueryscopeError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        QueryscopeError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        QueryscopeError::connection(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ConnectionConfig {
        ConnectionConfig {
            host: Some("db.example.com".to_string()),
            port: Some(5433),
            database: Some("appdb".to_string()),
            user: Some("reader".to_string()),
            password: None,
        }
    }

    #[test]
    fn test_map_connection_refused() {
        let err = map_connection_error(
            sqlx::Error::Configuration("connection refused".into()),
            &sample_config(),
        );
        assert!(matches!(err, QueryscopeError::Connection(_)));
        assert!(err.to_string().contains("db.example.com:5433"));
    }

    #[test]
    fn test_map_auth_failure() {
        let err = map_connection_error(
            sqlx::Error::Configuration("password authentication failed".into()),
            &sample_config(),
        );
        assert!(err.to_string().contains("user 'reader'"));
    }

    #[tokio::test]
    async fn test_provider_rejects_incomplete_config() {
        let provider = ConnectionProvider::new(ConnectionConfig::default());
        // No database name: open() must fail before any network activity.
        let result = provider.open().await;
        assert!(matches!(result, Err(QueryscopeError::Config(_))));
    }
}

//! Statement execution and plan retrieval.
//!
//! Statements run as given; callers that want validation run the
//! [`Validator`](crate::query::Validator) first. Each call opens its own
//! connection and closes it before returning, whatever the outcome.

use sqlx::{Executor as SqlxExecutor, PgConnection};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo};
use tracing::debug;

use crate::db::{convert_row, ColumnInfo, ConnectionProvider, QueryOutput};
use crate::error::{self, Result};
use crate::query::format;

/// Runs SQL statements and fetches query plans over per-call connections.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    provider: ConnectionProvider,
}

impl QueryExecutor {
    /// Creates an executor over the given provider.
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Runs a statement and returns its structured output.
    ///
    /// The entire result set is materialized in memory; acceptable for
    /// interactive use, no limit is applied.
    pub async fn run(&self, sql: &str) -> Result<QueryOutput> {
        let mut conn = self.provider.open().await?;
        let result = run_statement(&mut conn, sql).await;
        ConnectionProvider::close(conn).await;
        result
    }

    /// Runs a statement and renders the result for display.
    ///
    /// Statements without a result set yield the fixed
    /// [`NO_RESULT_MARKER`](crate::query::NO_RESULT_MARKER) string.
    pub async fn execute(&self, sql: &str) -> Result<String> {
        let output = self.run(sql).await?;
        Ok(format::render_output(&output))
    }

    /// Fetches the execution plan for a statement, one line per plan row,
    /// joined with newlines.
    pub async fn explain(&self, sql: &str) -> Result<String> {
        let mut conn = self.provider.open().await?;
        let result = fetch_plan(&mut conn, sql).await;
        ConnectionProvider::close(conn).await;
        result
    }
}

async fn run_statement(conn: &mut PgConnection, sql: &str) -> Result<QueryOutput> {
    debug!("Executing statement");

    // Describe first: a parse-only round trip that tells us whether the
    // statement has a result descriptor, without running it.
    let describe = (&mut *conn).describe(sql).await.map_err(error::from_sqlx)?;

    if describe.columns().is_empty() {
        sqlx::query(sql)
            .execute(&mut *conn)
            .await
            .map_err(error::from_sqlx)?;
        return Ok(QueryOutput::NoResultSet);
    }

    let pg_rows = sqlx::query(sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(error::from_sqlx)?;

    // Column metadata from the first row when there is one, otherwise
    // from the describe round trip (empty SELECT results keep headers).
    let columns: Vec<ColumnInfo> = match pg_rows.first() {
        Some(first_row) => first_row
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect(),
        None => describe
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect(),
    };

    let rows = pg_rows.iter().map(convert_row).collect();

    Ok(QueryOutput::Rows { columns, rows })
}

async fn fetch_plan(conn: &mut PgConnection, sql: &str) -> Result<String> {
    debug!("Fetching query plan");

    let plan_rows = sqlx::query(&format!("EXPLAIN {sql}"))
        .fetch_all(&mut *conn)
        .await
        .map_err(error::from_sqlx)?;

    let lines: Vec<String> = plan_rows
        .iter()
        .map(|row| row.try_get::<String, _>(0).map_err(error::from_sqlx))
        .collect::<Result<_>>()?;

    Ok(lines.join("\n"))
}

//! Database bootstrap.
//!
//! Applies the bundled schema script on a fresh connection. The script
//! is idempotent, so `init` can be run repeatedly.

use crate::db::ConnectionProvider;
use crate::error::{self, Result};
use tracing::info;

const BOOTSTRAP_SQL: &str = include_str!("bootstrap.sql");

/// Applies the bundled bootstrap script.
pub async fn init_db(provider: &ConnectionProvider) -> Result<()> {
    let mut conn = provider.open().await?;

    let result = sqlx::raw_sql(BOOTSTRAP_SQL).execute(&mut conn).await;

    ConnectionProvider::close(conn).await;

    result.map_err(error::from_sqlx)?;
    info!("Database initialized");
    Ok(())
}

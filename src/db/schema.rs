//! Schema introspection for queryscope.
//!
//! Builds a textual summary of the public schema for use as LLM prompt
//! context. The catalog is re-read on every call; nothing is cached.

use crate::db::ConnectionProvider;
use crate::error::{self, Result};

/// Reads (table, column, type) triples from the system catalog.
#[derive(Debug, Clone)]
pub struct SchemaIntrospector {
    provider: ConnectionProvider,
}

impl SchemaIntrospector {
    /// Creates an introspector over the given provider.
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Builds a schema summary for all user tables in the public schema,
    /// ordered by table name then column position.
    pub async fn summary(&self) -> Result<SchemaSummary> {
        let mut conn = self.provider.open().await?;

        let result: std::result::Result<Vec<(String, String, String)>, sqlx::Error> =
            sqlx::query_as(
                r#"
                SELECT table_name::text, column_name::text, data_type::text
                FROM information_schema.columns
                WHERE table_schema = 'public'
                ORDER BY table_name, ordinal_position
                "#,
            )
            .fetch_all(&mut conn)
            .await;

        ConnectionProvider::close(conn).await;

        let rows = result.map_err(error::from_sqlx)?;

        let mut tables: Vec<TableColumns> = Vec::new();
        for (table, column, data_type) in rows {
            let descriptor = format!("{column} ({data_type})");
            match tables.last_mut() {
                Some(last) if last.name == table => last.columns.push(descriptor),
                _ => tables.push(TableColumns {
                    name: table,
                    columns: vec![descriptor],
                }),
            }
        }

        Ok(SchemaSummary { tables })
    }
}

/// Columns of a single table, as "column (type)" descriptors in ordinal
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumns {
    /// Table name.
    pub name: String,

    /// Ordered column descriptors.
    pub columns: Vec<String>,
}

/// A textual summary of the database schema, grouped by table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSummary {
    tables: Vec<TableColumns>,
}

impl SchemaSummary {
    /// Creates a summary from pre-grouped tables. Used by tests and the
    /// introspector.
    pub fn from_tables(tables: Vec<TableColumns>) -> Self {
        Self { tables }
    }

    /// Returns the grouped tables in catalog order.
    pub fn tables(&self) -> &[TableColumns] {
        &self.tables
    }

    /// Returns true if no user tables were found.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Renders the summary as a human-readable block per table.
    pub fn render(&self) -> String {
        self.tables
            .iter()
            .map(|table| {
                let columns = table
                    .columns
                    .iter()
                    .map(|col| format!("  - {col}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("Table: {}\n{columns}", table.name)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> SchemaSummary {
        SchemaSummary::from_tables(vec![
            TableColumns {
                name: "orders".to_string(),
                columns: vec![
                    "id (integer)".to_string(),
                    "user_id (integer)".to_string(),
                    "total (numeric)".to_string(),
                ],
            },
            TableColumns {
                name: "users".to_string(),
                columns: vec!["id (integer)".to_string(), "name (text)".to_string()],
            },
        ])
    }

    #[test]
    fn test_render_groups_columns_under_table() {
        let rendered = sample_summary().render();

        assert!(rendered.contains("Table: users"));
        assert!(rendered.contains("  - id (integer)"));
        assert!(rendered.contains("  - name (text)"));

        // Columns appear after their table header.
        let users_idx = rendered.find("Table: users").unwrap();
        let name_idx = rendered.find("  - name (text)").unwrap();
        assert!(name_idx > users_idx);
    }

    #[test]
    fn test_render_preserves_column_order() {
        let rendered = sample_summary().render();
        let user_id = rendered.find("user_id (integer)").unwrap();
        let total = rendered.find("total (numeric)").unwrap();
        assert!(user_id < total);
    }

    #[test]
    fn test_empty_summary() {
        let summary = SchemaSummary::default();
        assert!(summary.is_empty());
        assert_eq!(summary.render(), "");
    }
}

//! Command-line argument parsing for queryscope.

use clap::{Parser, Subcommand};

/// An AI-assisted SQL query tool.
#[derive(Parser, Debug)]
#[command(name = "queryscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// PostgreSQL connection string (overrides DATABASE_URL)
    #[arg(short = 'c', long, value_name = "CONNECTION_STRING", global = true)]
    pub connection_string: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the database with the bundled sample schema
    Init,

    /// Check SQL syntax and print a hint on failure
    CheckSql {
        /// The SQL statement to validate
        query: String,
    },

    /// Run a SQL query and print the formatted result
    RunSql {
        /// The SQL statement to run
        query: String,

        /// Also print the query plan
        #[arg(long)]
        explain: bool,
    },

    /// Translate a natural-language question into SQL
    NlQuery {
        /// The question, in plain language
        query: String,

        /// Also run the generated SQL and print the result
        #[arg(long)]
        execute: bool,
    },

    /// Run the HTTP API server
    RunApi {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Listen port
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn test_parse_init() {
        let cli = parse_args(&["queryscope", "init"]);
        assert!(matches!(cli.command, Command::Init));
    }

    #[test]
    fn test_parse_check_sql() {
        let cli = parse_args(&["queryscope", "check-sql", "SELECT 1"]);
        match cli.command {
            Command::CheckSql { query } => assert_eq!(query, "SELECT 1"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_sql_with_explain() {
        let cli = parse_args(&["queryscope", "run-sql", "SELECT 1", "--explain"]);
        match cli.command {
            Command::RunSql { query, explain } => {
                assert_eq!(query, "SELECT 1");
                assert!(explain);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_sql_default_no_explain() {
        let cli = parse_args(&["queryscope", "run-sql", "SELECT 1"]);
        match cli.command {
            Command::RunSql { explain, .. } => assert!(!explain),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_nl_query() {
        let cli = parse_args(&["queryscope", "nl-query", "how many users?", "--execute"]);
        match cli.command {
            Command::NlQuery { query, execute } => {
                assert_eq!(query, "how many users?");
                assert!(execute);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_api_defaults() {
        let cli = parse_args(&["queryscope", "run-api"]);
        match cli.command {
            Command::RunApi { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_api_custom() {
        let cli = parse_args(&["queryscope", "run-api", "--host", "0.0.0.0", "--port", "9000"]);
        match cli.command {
            Command::RunApi { host, port } => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 9000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_connection_string() {
        let cli = parse_args(&[
            "queryscope",
            "run-sql",
            "SELECT 1",
            "--connection-string",
            "postgres://localhost/mydb",
        ]);
        assert_eq!(
            cli.connection_string,
            Some("postgres://localhost/mydb".to_string())
        );
    }
}

//! queryscope - an AI-assisted SQL query tool.

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use queryscope::api;
use queryscope::cli::{Cli, Command};
use queryscope::config::{Config, ConnectionConfig};
use queryscope::db::{self, ConnectionProvider, SchemaIntrospector};
use queryscope::error::Result;
use queryscope::llm::{HintGenerator, NlTranslator};
use queryscope::query::{QueryExecutor, Validator};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(conn_str) = &cli.connection_string {
        config.database = ConnectionConfig::from_connection_string(conn_str)?;
    }

    let provider = ConnectionProvider::new(config.database.clone());

    match cli.command {
        Command::Init => {
            db::init_db(&provider).await?;
            println!("Database initialized.");
        }

        Command::CheckSql { query } => {
            let validator = Validator::new(provider, HintGenerator::new(&config.llm));
            let result = validator.validate(&query).await?;
            println!("{}", result.message);
            if let Some(hint) = result.hint {
                println!("Hint: {hint}");
            }
        }

        Command::RunSql { query, explain } => {
            let executor = QueryExecutor::new(provider);
            if explain {
                println!("Query plan:");
                println!("{}", executor.explain(&query).await?);
            }
            println!("Result:");
            println!("{}", executor.execute(&query).await?);
        }

        Command::NlQuery { query, execute } => {
            let introspector = SchemaIntrospector::new(provider.clone());
            let translator = NlTranslator::new(&config.llm, introspector)?;
            let sql = translator.translate(&query).await?;
            println!("Generated SQL:\n{sql}");
            if execute {
                let executor = QueryExecutor::new(provider);
                println!("Result:");
                println!("{}", executor.execute(&sql).await?);
            }
        }

        Command::RunApi { host, port } => {
            api::serve(config, &host, port).await?;
        }
    }

    Ok(())
}

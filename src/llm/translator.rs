//! Natural-language-to-SQL translation.
//!
//! Builds a prompt from the live schema summary and the user's question,
//! asks the LLM for exactly one SQL statement, and extracts it from the
//! reply. Unlike the hint path, failures here propagate to the caller.

use std::sync::Arc;
use tracing::debug;

use crate::config::LlmConfig;
use crate::db::{SchemaIntrospector, SchemaSummary};
use crate::error::Result;
use crate::llm::chat::{ChatClient, ChatConfig};
use crate::llm::parser::extract_sql;
use crate::llm::types::Message;
use crate::llm::LlmClient;

/// Request timeout for translation, in seconds.
const TRANSLATE_TIMEOUT_SECS: u64 = 30;

const TRANSLATE_SYSTEM_PROMPT: &str = "You are a SQL assistant.";

/// Translates natural-language questions into SQL statements.
pub struct NlTranslator {
    client: Arc<dyn LlmClient>,
    introspector: SchemaIntrospector,
}

impl NlTranslator {
    /// Builds a translator from the LLM settings.
    ///
    /// Fails with a configuration error when no API key is set; unlike
    /// hints, translation has no degraded mode.
    pub fn new(llm: &LlmConfig, introspector: SchemaIntrospector) -> Result<Self> {
        let config = ChatConfig::from_llm_config(llm, TRANSLATE_TIMEOUT_SECS)?;
        let client = ChatClient::new(config)?;

        Ok(Self {
            client: Arc::new(client),
            introspector,
        })
    }

    /// Builds a translator around an existing client. Used in tests.
    pub fn with_client(client: Arc<dyn LlmClient>, introspector: SchemaIntrospector) -> Self {
        Self {
            client,
            introspector,
        }
    }

    /// Translates a question into a single SQL statement.
    ///
    /// The schema summary is re-read from the catalog on every call so
    /// the prompt always reflects the current database.
    pub async fn translate(&self, question: &str) -> Result<String> {
        let schema = self.introspector.summary().await?;
        let messages = build_messages(&schema, question);

        debug!("Requesting SQL translation");
        let reply = self.client.complete(&messages).await?;

        extract_sql(&reply)
    }
}

/// Builds the message list for a translation request.
fn build_messages(schema: &SchemaSummary, question: &str) -> Vec<Message> {
    let prompt = format!(
        "You are a SQL assistant. The database schema is:\n\n{}\n\nTranslate the user's question into a standard PostgreSQL query.\nReturn exactly one SQL statement and nothing else, no explanation.\n\nThe question is:\n{}",
        schema.render(),
        question
    );

    vec![
        Message::system(TRANSLATE_SYSTEM_PROMPT),
        Message::user(prompt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TableColumns;
    use crate::llm::types::Role;

    fn sample_summary() -> SchemaSummary {
        SchemaSummary::from_tables(vec![TableColumns {
            name: "users".to_string(),
            columns: vec!["id (integer)".to_string(), "name (text)".to_string()],
        }])
    }

    #[test]
    fn test_build_messages_embeds_schema_and_question() {
        let messages = build_messages(&sample_summary(), "How many users are there?");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("Table: users"));
        assert!(messages[1].content.contains("How many users are there?"));
        assert!(messages[1].content.contains("exactly one SQL statement"));
    }

    #[test]
    fn test_new_requires_credentials() {
        let introspector = SchemaIntrospector::new(crate::db::ConnectionProvider::new(
            crate::config::ConnectionConfig::default(),
        ));
        let result = NlTranslator::new(&LlmConfig::default(), introspector);
        assert!(result.is_err());
    }
}

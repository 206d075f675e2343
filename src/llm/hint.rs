//! Remediation hints for failed SQL statements.
//!
//! Wraps the chat client so that validation never depends on the LLM
//! service being up: every failure mode collapses to a static string.

use std::sync::Arc;
use tracing::warn;

use crate::config::LlmConfig;
use crate::llm::chat::{ChatClient, ChatConfig};
use crate::llm::types::Message;
use crate::llm::LlmClient;

/// Request timeout for hint generation, in seconds.
const HINT_TIMEOUT_SECS: u64 = 10;

/// Sampling temperature for hint generation.
const HINT_TEMPERATURE: f32 = 0.3;

/// Returned when no API credential is configured. No network call is
/// made in that case.
pub const MISSING_CREDENTIAL_HINT: &str =
    "AI_API_KEY is not set; no AI suggestion available.";

/// Returned when the hint request fails for any reason.
pub const FALLBACK_HINT: &str =
    "Check that column and table names are spelled correctly, and that clauses are separated by spaces.";

const HINT_SYSTEM_PROMPT: &str = "You are a database expert who helps users fix SQL syntax errors. Analyze the error and give a concrete suggestion.";

/// Generates natural-language fix suggestions for failing SQL.
pub struct HintGenerator {
    client: Option<Arc<dyn LlmClient>>,
}

impl HintGenerator {
    /// Builds a hint generator from the LLM settings.
    ///
    /// Without a credential the generator is inert: `suggest_fix`
    /// returns [`MISSING_CREDENTIAL_HINT`] without any network activity.
    pub fn new(llm: &LlmConfig) -> Self {
        if !llm.has_credentials() {
            return Self { client: None };
        }

        let client = ChatConfig::from_llm_config(llm, HINT_TIMEOUT_SECS)
            .map(|config| config.with_temperature(HINT_TEMPERATURE))
            .and_then(ChatClient::new);

        match client {
            Ok(client) => Self {
                client: Some(Arc::new(client)),
            },
            Err(e) => {
                warn!("Hint generator unavailable: {e}");
                Self { client: None }
            }
        }
    }

    /// Builds a hint generator around an existing client. Used in tests.
    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Suggests a fix for a SQL statement the database rejected.
    ///
    /// Never fails: transport or parse errors are absorbed and replaced
    /// with [`FALLBACK_HINT`].
    pub async fn suggest_fix(&self, sql: &str, error_text: &str) -> String {
        let Some(client) = &self.client else {
            return MISSING_CREDENTIAL_HINT.to_string();
        };

        let messages = vec![
            Message::system(HINT_SYSTEM_PROMPT),
            Message::user(format!(
                "The following SQL has a syntax error. Explain the cause and suggest a fix.\n\nSQL:\n{sql}\n\nError:\n{error_text}"
            )),
        ];

        match client.complete(&messages).await {
            Ok(reply) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    FALLBACK_HINT.to_string()
                } else {
                    reply.to_string()
                }
            }
            Err(e) => {
                warn!("Hint generation failed: {e}");
                FALLBACK_HINT.to_string()
            }
        }
    }
}

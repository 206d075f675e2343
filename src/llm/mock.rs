//! Mock LLM client for testing.
//!
//! Provides deterministic responses based on input patterns, and a
//! failing mode for exercising fallback paths. No network access.

use async_trait::async_trait;

use crate::error::{QueryscopeError, Result};
use crate::llm::types::Message;
use crate::llm::LlmClient;

/// Mock LLM client that returns canned responses based on input patterns.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
    /// When set, every call fails with a translation error.
    fail: bool,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock client whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Adds a custom response mapping.
    ///
    /// When the combined input contains `pattern`, the mock returns
    /// `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    fn mock_response(&self, input: &str) -> String {
        let input_lower = input.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if input_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        if input_lower.contains("count") && input_lower.contains("users") {
            return "```sql\nSELECT COUNT(*) FROM users;\n```".to_string();
        }

        if input_lower.contains("orders") {
            return "```sql\nSELECT * FROM orders;\n```".to_string();
        }

        "```sql\nSELECT * FROM users;\n```".to_string()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        if self.fail {
            return Err(QueryscopeError::translation("mock client failure"));
        }

        let input = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(self.mock_response(&input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_response_is_sql() {
        let client = MockLlmClient::new();
        let reply = client
            .complete(&[Message::user("Show me all users")])
            .await
            .unwrap();
        assert!(reply.contains("SELECT"));
    }

    #[tokio::test]
    async fn test_custom_response() {
        let client = MockLlmClient::new().with_response("widgets", "SELECT * FROM widgets");
        let reply = client
            .complete(&[Message::user("list the widgets")])
            .await
            .unwrap();
        assert_eq!(reply, "SELECT * FROM widgets");
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let client = MockLlmClient::failing();
        let result = client.complete(&[Message::user("anything")]).await;
        assert!(matches!(result, Err(QueryscopeError::Translation(_))));
    }
}

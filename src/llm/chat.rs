//! Chat-completion HTTP client.
//!
//! Speaks the `{model, messages, temperature?}` request shape against a
//! configurable base URL under bearer-token authorization. Each consumer
//! builds its own client with the timeout its contract requires; there
//! are no retries beyond the single request.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::{QueryscopeError, Result};
use crate::llm::types::Message;
use crate::llm::LlmClient;

/// Chat client configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the chat-completion endpoint.
    pub api_base: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model to send with each request.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature, if the consumer wants one.
    pub temperature: Option<f32>,
}

impl ChatConfig {
    /// Builds a chat config from the application LLM settings.
    ///
    /// Fails with a configuration error when no API key is set.
    pub fn from_llm_config(llm: &LlmConfig, timeout_secs: u64) -> Result<Self> {
        let api_key = llm
            .api_key
            .clone()
            .ok_or_else(|| QueryscopeError::config("AI_API_KEY is not set"))?;

        Ok(Self {
            api_base: llm.api_base.clone(),
            api_key,
            model: llm.model.clone(),
            timeout_secs,
            temperature: None,
        })
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// HTTP chat-completion client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: ChatConfig,
    client: Client,
}

impl ChatClient {
    /// Creates a new chat client with the given configuration.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                QueryscopeError::translation(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn parse_error(status: reqwest::StatusCode, body: &str) -> QueryscopeError {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return QueryscopeError::translation(
                "Authentication failed. Check your AI_API_KEY.",
            );
        }

        if let Ok(error_response) = serde_json::from_str::<ChatErrorResponse>(body) {
            return QueryscopeError::translation(format!(
                "LLM API error: {}",
                error_response.error.message
            ));
        }

        QueryscopeError::translation(format!("LLM API error ({status}): {body}"))
    }
}

#[async_trait]
impl LlmClient for ChatClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            temperature: self.config.temperature,
        };

        debug!(model = %self.config.model, "Sending chat-completion request");

        let response = self
            .client
            .post(self.endpoint())
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QueryscopeError::translation("LLM request timed out.")
                } else if e.is_connect() {
                    QueryscopeError::translation(
                        "Failed to connect to the LLM API. Check your network and AI_API_BASE.",
                    )
                } else {
                    QueryscopeError::translation(format!("LLM request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            QueryscopeError::translation(format!("Failed to read LLM response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        let response: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            QueryscopeError::translation(format!("Failed to parse LLM response: {e}"))
        })?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| QueryscopeError::translation("LLM returned no choices"))
    }
}

// Chat-completion wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatErrorResponse {
    error: ChatError,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}

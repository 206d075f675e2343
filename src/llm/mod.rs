//! LLM integration for queryscope.
//!
//! Provides the chat-completion client and the two consumers built on
//! top of it: the hint generator (absorbs failures) and the NL-to-SQL
//! translator (propagates them).

pub mod chat;
pub mod hint;
pub mod mock;
pub mod parser;
pub mod translator;
pub mod types;

pub use chat::{ChatClient, ChatConfig};
pub use hint::HintGenerator;
pub use mock::MockLlmClient;
pub use parser::extract_sql;
pub use translator::NlTranslator;
pub use types::{Message, Role};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for LLM clients that can generate completions.
///
/// Implementations must be thread-safe (Send + Sync) to support async
/// operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given messages.
    ///
    /// Returns the complete response as a single string.
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

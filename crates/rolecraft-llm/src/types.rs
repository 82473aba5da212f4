//! Core types for the generation client abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rolecraft_utils::error::LlmError;

/// Role of a message in a chat-completions conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Turns an assembled prompt into generated text.
///
/// Implementations make exactly one attempt per call; retrying is the
/// caller's decision and the workflow never does it.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text for `prompt`.
    ///
    /// # Errors
    ///
    /// - [`LlmError::NoContent`] when the call succeeds with no usable text
    /// - [`LlmError::ProviderStatus`] and friends for service failures
    /// - [`LlmError::Transport`] / [`LlmError::Timeout`] for network failures
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

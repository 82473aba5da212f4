//! OpenAI-compatible chat-completions backend
//!
//! Serves both the `openai` and `openrouter` providers; they share the wire
//! format and differ only in endpoint, key variable and a couple of headers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use rolecraft_config::Config;
use rolecraft_utils::error::LlmError;

use crate::http_client::HttpClient;
use crate::types::{GenerationClient, Message, MessageRole};

/// System message sent ahead of every prompt
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Endpoint and credential defaults for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderProfile {
    pub name: &'static str,
    pub default_base_url: &'static str,
    pub default_api_key_env: &'static str,
}

impl ProviderProfile {
    pub const OPENAI: ProviderProfile = ProviderProfile {
        name: "openai",
        default_base_url: "https://api.openai.com/v1/chat/completions",
        default_api_key_env: "OPENAI_API_KEY",
    };

    pub const OPENROUTER: ProviderProfile = ProviderProfile {
        name: "openrouter",
        default_base_url: "https://openrouter.ai/api/v1/chat/completions",
        default_api_key_env: "OPENROUTER_API_KEY",
    };
}

/// HTTP request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct HttpParams {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for HttpParams {
    fn default() -> Self {
        Self {
            temperature: rolecraft_config::DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }
}

/// OpenAI-compatible generation backend
#[derive(Clone)]
pub struct OpenAiBackend {
    client: HttpClient,
    profile: ProviderProfile,
    base_url: String,
    api_key: String,
    model: String,
    params: HttpParams,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiBackend")
            .field("provider", &self.profile.name)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("params", &self.params)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenAiBackend {
    /// Create a backend.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(
        profile: ProviderProfile,
        api_key: String,
        base_url: Option<String>,
        model: String,
        params: HttpParams,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = HttpClient::new()?;

        Ok(Self {
            client,
            profile,
            base_url: base_url.unwrap_or_else(|| profile.default_base_url.to_string()),
            api_key,
            model,
            params,
            timeout,
        })
    }

    /// Create a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the API key environment variable
    /// is unset or empty, or the HTTP client cannot be constructed.
    pub fn new_from_config(config: &Config, profile: ProviderProfile) -> Result<Self, LlmError> {
        let api_key_env = config
            .llm
            .api_key_env
            .as_deref()
            .unwrap_or(profile.default_api_key_env);

        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Misconfiguration(format!(
                    "{} API key not found in environment variable '{api_key_env}'. \
                     Set this variable or configure a different api_key_env in [llm].",
                    profile.name
                ))
            })?;

        let params = HttpParams {
            temperature: config.temperature(),
            max_tokens: config.llm.max_tokens,
        };

        Self::new(
            profile,
            api_key,
            config.llm.base_url.clone(),
            config.model().to_string(),
            params,
            config.llm_timeout(),
        )
    }

    #[must_use]
    pub fn provider(&self) -> &'static str {
        self.profile.name
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_messages(prompt: &str) -> Vec<ChatMessage> {
        [Message::system(SYSTEM_PROMPT), Message::user(prompt)]
            .into_iter()
            .map(|msg| ChatMessage {
                role: msg.role,
                content: msg.content,
            })
            .collect()
    }
}

#[async_trait]
impl GenerationClient for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let provider = self.profile.name;

        debug!(
            provider = provider,
            model = %self.model,
            temperature = self.params.temperature,
            max_tokens = ?self.params.max_tokens,
            prompt_len = prompt.len(),
            "Invoking generation backend"
        );

        let request_body = ChatRequest {
            model: &self.model,
            messages: Self::build_messages(prompt),
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
            stream: false,
        };

        let mut request = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request_body);
        if self.profile == ProviderProfile::OPENROUTER {
            request = request.header("X-Title", "rolecraft");
        }

        let response = self.client.execute(request, self.timeout, provider).await?;

        let response_body: ChatResponse = response.json().await.map_err(|e| {
            LlmError::Transport(format!("Failed to parse {provider} response: {e}"))
        })?;

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::NoContent)?;

        debug!(
            provider = provider,
            output_len = content.len(),
            tokens_input = ?response_body.usage.as_ref().map(|u| u.prompt_tokens),
            tokens_output = ?response_body.usage.as_ref().map(|u| u.completion_tokens),
            "Generation completed"
        );

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: MessageRole,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

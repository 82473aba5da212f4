//! Generation client abstraction
//!
//! The workflow talks to a [`GenerationClient`]. [`from_config`] builds the
//! configured provider; tests substitute their own implementations.

mod deferred;
pub(crate) mod http_client;
mod openai_backend;
mod types;

use tracing::info;

use rolecraft_config::Config;

pub use deferred::DeferredClient;
pub use openai_backend::{HttpParams, OpenAiBackend, ProviderProfile, SYSTEM_PROMPT};
pub use rolecraft_utils::error::LlmError;
pub use types::{GenerationClient, Message, MessageRole};

/// Construct the generation client named by `[llm] provider`.
///
/// # Errors
///
/// Returns `LlmError::Unsupported` if the provider is unknown.
/// Returns `LlmError::Misconfiguration` if the API key is missing or the HTTP
/// client cannot be built.
pub fn from_config(config: &Config) -> Result<Box<dyn GenerationClient>, LlmError> {
    let profile = match config.llm_provider() {
        "openai" => ProviderProfile::OPENAI,
        "openrouter" => ProviderProfile::OPENROUTER,
        unknown => {
            return Err(LlmError::Unsupported(format!(
                "Unknown LLM provider '{unknown}'. Supported providers: openai, openrouter."
            )));
        }
    };

    let backend = OpenAiBackend::new_from_config(config, profile)?;
    info!(
        provider = backend.provider(),
        model = %backend.model(),
        "Initialized generation client"
    );
    Ok(Box::new(backend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_unknown_provider_is_unsupported() {
        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("anthropic".to_string());

        match from_config(&config) {
            Err(LlmError::Unsupported(msg)) => {
                assert!(msg.contains("anthropic"));
                assert!(msg.contains("openai, openrouter"));
            }
            Err(other) => panic!("expected Unsupported, got {other:?}"),
            Ok(_) => panic!("expected Unsupported, got a client"),
        }
    }

    #[test]
    fn test_missing_api_key_is_misconfiguration() {
        let mut config = Config::minimal_for_testing();
        config.llm.api_key_env = Some("ROLECRAFT_TEST_KEY_THAT_IS_NEVER_SET".to_string());

        match from_config(&config) {
            Err(LlmError::Misconfiguration(msg)) => {
                assert!(msg.contains("ROLECRAFT_TEST_KEY_THAT_IS_NEVER_SET"));
            }
            Err(other) => panic!("expected Misconfiguration, got {other:?}"),
            Ok(_) => panic!("expected Misconfiguration, got a client"),
        }
    }

    #[test]
    #[serial]
    fn test_builds_openrouter_backend_from_env_key() {
        let var = "ROLECRAFT_TEST_OPENROUTER_KEY";
        unsafe { std::env::set_var(var, "or-key") };

        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("openrouter".to_string());
        config.llm.api_key_env = Some(var.to_string());
        let backend = OpenAiBackend::new_from_config(&config, ProviderProfile::OPENROUTER);

        unsafe { std::env::remove_var(var) };

        let backend = backend.unwrap();
        assert_eq!(backend.provider(), "openrouter");
        assert_eq!(backend.model(), "gpt-4");
        assert_eq!(
            backend.base_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert!(from_config(&config).is_err(), "key was removed");
    }
}

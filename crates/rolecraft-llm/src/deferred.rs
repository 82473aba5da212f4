//! Generation client built on first use.

use async_trait::async_trait;
use once_cell::sync::OnceCell;

use rolecraft_config::Config;
use rolecraft_utils::error::LlmError;

use crate::types::GenerationClient;

/// Wraps [`from_config`](crate::from_config) so backend construction (and
/// the API key lookup) happens on the first `generate` call.
///
/// A construction failure is returned from that call and retried on the
/// next one.
pub struct DeferredClient {
    config: Config,
    client: OnceCell<Box<dyn GenerationClient>>,
}

impl DeferredClient {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Whether the backend has been built yet.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }
}

impl std::fmt::Debug for DeferredClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredClient")
            .field("provider", &self.config.llm_provider())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[async_trait]
impl GenerationClient for DeferredClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let client = self
            .client
            .get_or_try_init(|| crate::from_config(&self.config))?;
        client.generate(prompt).await
    }
}

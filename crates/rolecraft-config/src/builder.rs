use std::path::PathBuf;
use std::time::Duration;

use rolecraft_utils::error::ConfigError;
use rolecraft_utils::types::ConfigSource;

use crate::model::Config;

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding rolecraft without environment variables or
    /// config files.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rolecraft_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .bind("0.0.0.0:8080")
    ///     .model("gpt-4o-mini")
    ///     .generation_timeout(Duration::from_secs(60))
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.bind(), "0.0.0.0:8080");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Fluent builder for [`Config`].
///
/// All values set via the builder are attributed to
/// [`ConfigSource::Programmatic`]. Unset values fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    bind: Option<String>,
    fixtures_dir: Option<PathBuf>,
    llm_provider: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    api_key_env: Option<String>,
    base_url: Option<String>,
    llm_timeout: Option<Duration>,
    fetch_timeout: Option<Duration>,
    generation_timeout: Option<Duration>,
    log_level: Option<String>,
    log_json: Option<bool>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind = Some(addr.into());
        self
    }

    #[must_use]
    pub fn fixtures_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = Some(path.into());
        self
    }

    /// Set the generation provider (`openai` or `openrouter`).
    #[must_use]
    pub fn llm_provider(mut self, provider: impl Into<String>) -> Self {
        self.llm_provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Name of the environment variable that holds the API key.
    #[must_use]
    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request HTTP timeout. Sub-second precision is truncated.
    #[must_use]
    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn log_level(mut self, directive: impl Into<String>) -> Self {
        self.log_level = Some(directive.into());
        self
    }

    #[must_use]
    pub fn log_json(mut self, json: bool) -> Self {
        self.log_json = Some(json);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a value fails validation.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        let mut set = |key: &str, present: bool| {
            let source = if present {
                ConfigSource::Programmatic
            } else {
                ConfigSource::Default
            };
            config.source_attribution.insert(key.to_string(), source);
        };
        set("bind", self.bind.is_some());
        set("fixtures_dir", self.fixtures_dir.is_some());
        set("llm_provider", self.llm_provider.is_some());
        set("model", self.model.is_some());
        set("temperature", self.temperature.is_some());
        set("max_tokens", self.max_tokens.is_some());
        set("api_key_env", self.api_key_env.is_some());
        set("base_url", self.base_url.is_some());
        set("llm_timeout_secs", self.llm_timeout.is_some());
        set("fetch_timeout_secs", self.fetch_timeout.is_some());
        set("generation_timeout_secs", self.generation_timeout.is_some());
        set("log_level", self.log_level.is_some());
        set("log_json", self.log_json.is_some());

        config.server.bind = self.bind;
        config.sources.fixtures_dir = self.fixtures_dir;
        config.llm.provider = self.llm_provider;
        config.llm.model = self.model;
        config.llm.temperature = self.temperature;
        config.llm.max_tokens = self.max_tokens;
        config.llm.api_key_env = self.api_key_env;
        config.llm.base_url = self.base_url;
        config.llm.timeout_secs = self.llm_timeout.map(|d| d.as_secs());
        config.workflow.fetch_timeout_secs = self.fetch_timeout.map(|d| d.as_secs());
        config.workflow.generation_timeout_secs = self.generation_timeout.map(|d| d.as_secs());
        config.logging.level = self.log_level;
        config.logging.json = self.log_json;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.model(), "gpt-4");
        assert_eq!(
            config.source_attribution.get("model"),
            Some(&ConfigSource::Default)
        );
    }

    #[test]
    fn test_builder_values_are_programmatic() {
        let config = Config::builder()
            .model("gpt-4o")
            .llm_provider("openrouter")
            .fetch_timeout(Duration::from_secs(3))
            .log_json(true)
            .build()
            .unwrap();

        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.llm_provider(), "openrouter");
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(3)));
        assert!(config.log_json());
        assert_eq!(
            config.source_attribution.get("fetch_timeout_secs"),
            Some(&ConfigSource::Programmatic)
        );
    }

    #[test]
    fn test_builder_validates() {
        let result = Config::builder().bind("not an address").build();
        assert!(matches!(result, Err(ConfigError::InvalidValue { ref key, .. }) if key == "bind"));

        // Sub-second timeouts truncate to zero and are rejected
        let result = Config::builder()
            .generation_timeout(Duration::from_millis(500))
            .build();
        assert!(result.is_err());
    }
}

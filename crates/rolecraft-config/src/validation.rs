use std::net::SocketAddr;

use rolecraft_utils::error::ConfigError;

use crate::model::{Config, KNOWN_PROVIDERS};

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bind) = &self.server.bind
            && bind.parse::<SocketAddr>().is_err()
        {
            return Err(invalid("bind", format!("'{bind}' is not a socket address")));
        }

        if let Some(provider) = &self.llm.provider
            && !KNOWN_PROVIDERS.contains(&provider.as_str())
        {
            return Err(invalid(
                "provider",
                format!(
                    "unknown provider '{provider}'; expected one of: {}",
                    KNOWN_PROVIDERS.join(", ")
                ),
            ));
        }

        if let Some(model) = &self.llm.model
            && model.trim().is_empty()
        {
            return Err(invalid("model", "must not be empty"));
        }

        if let Some(temperature) = self.llm.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(invalid(
                "temperature",
                format!("{temperature} is outside the range 0.0 to 2.0"),
            ));
        }

        if self.llm.max_tokens == Some(0) {
            return Err(invalid("max_tokens", "must be greater than 0"));
        }

        if let Some(api_key_env) = &self.llm.api_key_env
            && api_key_env.trim().is_empty()
        {
            return Err(invalid("api_key_env", "must name an environment variable"));
        }

        if let Some(base_url) = &self.llm.base_url
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            return Err(invalid("base_url", "must start with http:// or https://"));
        }

        for (key, value) in [
            ("timeout_secs", self.llm.timeout_secs),
            ("fetch_timeout_secs", self.workflow.fetch_timeout_secs),
            ("generation_timeout_secs", self.workflow.generation_timeout_secs),
        ] {
            if value == Some(0) {
                return Err(invalid(key, "must be greater than 0"));
            }
        }

        Ok(())
    }
}

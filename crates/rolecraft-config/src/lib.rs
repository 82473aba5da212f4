//! Configuration management for rolecraft
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > environment > file > defaults. The TOML file has `[server]`,
//! `[sources]`, `[llm]`, `[workflow]` and `[logging]` sections.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [sources]
//! fixtures_dir = "mocks"
//!
//! [llm]
//! provider = "openai"
//! model = "gpt-4"
//! temperature = 0.7
//! api_key_env = "OPENAI_API_KEY"
//!
//! [workflow]
//! fetch_timeout_secs = 10
//! generation_timeout_secs = 120
//! ```

mod builder;
mod discovery;
mod model;
mod sources;
mod validation;

use std::path::Path;
use std::time::Duration;

pub use builder::ConfigBuilder;
pub use discovery::{CONFIG_DIR_NAME, HOME_ENV_VAR};
pub use model::*;
pub use rolecraft_utils::types::ConfigSource;

impl Config {
    /// Listen address for the HTTP transport.
    #[must_use]
    pub fn bind(&self) -> &str {
        self.server.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    /// Directory the file-backed providers read fixtures from.
    #[must_use]
    pub fn fixtures_dir(&self) -> &Path {
        self.sources
            .fixtures_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_FIXTURES_DIR))
    }

    #[must_use]
    pub fn llm_provider(&self) -> &str {
        self.llm.provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.llm.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.llm.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Per-request HTTP timeout for the generation backend.
    #[must_use]
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_secs.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS))
    }

    /// Upper bound on the concurrent fetch stage; `None` means unbounded.
    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.workflow.fetch_timeout_secs.map(Duration::from_secs)
    }

    /// Upper bound on the generation stage; `None` means unbounded.
    #[must_use]
    pub fn generation_timeout(&self) -> Option<Duration> {
        self.workflow.generation_timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }

    #[must_use]
    pub fn log_json(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Config {
    /// Create a minimal Config for testing purposes
    ///
    /// Uses built-in defaults everywhere and reads nothing from disk or the
    /// environment.
    pub fn minimal_for_testing() -> Self {
        Config::default()
    }
}

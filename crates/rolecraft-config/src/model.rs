use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use rolecraft_utils::types::ConfigSource;

/// Default listen address for `rolecraft serve`
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default directory holding `JIRA-<id>.json` / `CONFLUENCE-<id>.json` fixtures
pub const DEFAULT_FIXTURES_DIR: &str = "mocks";

/// Default generation provider
pub const DEFAULT_PROVIDER: &str = "openai";

/// Default generation model
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default per-request HTTP timeout for the generation backend
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Providers the backend factory knows how to build
pub const KNOWN_PROVIDERS: &[&str] = &["openai", "openrouter"];

/// Resolved configuration with per-value source attribution.
///
/// Every field is optional; accessors in `lib.rs` apply the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub sources: SourcesConfig,
    pub llm: LlmConfig,
    pub workflow: WorkflowConfig,
    pub logging: LoggingConfig,
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[server]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

/// `[sources]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SourcesConfig {
    pub fixtures_dir: Option<PathBuf>,
}

/// `[llm]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LlmConfig {
    /// `openai` or `openrouter`
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Name of the environment variable holding the API key (never the key itself)
    pub api_key_env: Option<String>,
    /// Full chat-completions endpoint URL
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[workflow]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WorkflowConfig {
    pub fetch_timeout_secs: Option<u64>,
    pub generation_timeout_secs: Option<u64>,
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `rolecraft=debug,info`
    pub level: Option<String>,
    pub json: Option<bool>,
}

/// Overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub fixtures_dir: Option<PathBuf>,
    pub llm_provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use rolecraft_utils::error::ConfigError;
use rolecraft_utils::types::ConfigSource;

use crate::model::{
    CliArgs, Config, DEFAULT_BIND, LlmConfig, LoggingConfig, ServerConfig, SourcesConfig,
    WorkflowConfig,
};

/// Directory holding `config.toml` when searching upward.
pub const CONFIG_DIR_NAME: &str = ".rolecraft";

/// Points at a directory containing `config.toml`.
pub const HOME_ENV_VAR: &str = "ROLECRAFT_HOME";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    server: Option<ServerConfig>,
    sources: Option<SourcesConfig>,
    llm: Option<LlmConfig>,
    workflow: Option<WorkflowConfig>,
    logging: Option<LoggingConfig>,
}

/// Overwrite `$target` with `$value` when present and record where it came from.
macro_rules! overlay {
    ($attr:expr, $source:expr, $key:literal, $target:expr, $value:expr) => {
        if let Some(value) = $value {
            $target = Some(value);
            $attr.insert($key.to_string(), $source.clone());
        }
    };
}

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests. Environment overrides are
    /// still read from the process environment.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut config = Config::default();
        let attr = &mut config.source_attribution;

        for key in [
            "bind",
            "fixtures_dir",
            "llm_provider",
            "model",
            "temperature",
            "llm_timeout_secs",
            "log_json",
        ] {
            attr.insert(key.to_string(), ConfigSource::Default);
        }

        let config_path = match &cli_args.config_path {
            Some(explicit) => Some(explicit.clone()),
            None => Self::discover_config_file_from(start_dir)?,
        };

        if let Some(path) = &config_path {
            let file = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            let src = ConfigSource::Config;

            if let Some(server) = file.server {
                overlay!(attr, src, "bind", config.server.bind, server.bind);
            }
            if let Some(sources) = file.sources {
                overlay!(attr, src, "fixtures_dir", config.sources.fixtures_dir, sources.fixtures_dir);
            }
            if let Some(llm) = file.llm {
                overlay!(attr, src, "llm_provider", config.llm.provider, llm.provider);
                overlay!(attr, src, "model", config.llm.model, llm.model);
                overlay!(attr, src, "temperature", config.llm.temperature, llm.temperature);
                overlay!(attr, src, "max_tokens", config.llm.max_tokens, llm.max_tokens);
                overlay!(attr, src, "api_key_env", config.llm.api_key_env, llm.api_key_env);
                overlay!(attr, src, "base_url", config.llm.base_url, llm.base_url);
                overlay!(attr, src, "llm_timeout_secs", config.llm.timeout_secs, llm.timeout_secs);
            }
            if let Some(workflow) = file.workflow {
                overlay!(
                    attr,
                    src,
                    "fetch_timeout_secs",
                    config.workflow.fetch_timeout_secs,
                    workflow.fetch_timeout_secs
                );
                overlay!(
                    attr,
                    src,
                    "generation_timeout_secs",
                    config.workflow.generation_timeout_secs,
                    workflow.generation_timeout_secs
                );
            }
            if let Some(logging) = file.logging {
                overlay!(attr, src, "log_level", config.logging.level, logging.level);
                overlay!(attr, src, "log_json", config.logging.json, logging.json);
            }
        }

        // Environment overrides the file
        let src = ConfigSource::Env;
        if let Some(port) = non_empty_env("PORT") {
            let port: u16 = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: format!("'{port}' is not a valid port number"),
            })?;
            let current = config.server.bind.as_deref().unwrap_or(DEFAULT_BIND);
            let host = current.rsplit_once(':').map_or(current, |(host, _)| host);
            overlay!(attr, src, "bind", config.server.bind, Some(format!("{host}:{port}")));
        }
        overlay!(attr, src, "log_level", config.logging.level, non_empty_env("ROLECRAFT_LOG"));
        overlay!(
            attr,
            src,
            "fixtures_dir",
            config.sources.fixtures_dir,
            non_empty_env("ROLECRAFT_FIXTURES_DIR").map(PathBuf::from)
        );
        overlay!(
            attr,
            src,
            "llm_provider",
            config.llm.provider,
            non_empty_env("ROLECRAFT_LLM_PROVIDER")
        );
        overlay!(attr, src, "model", config.llm.model, non_empty_env("ROLECRAFT_MODEL"));

        // CLI overrides everything
        let src = ConfigSource::Cli;
        overlay!(attr, src, "bind", config.server.bind, cli_args.bind.clone());
        overlay!(
            attr,
            src,
            "fixtures_dir",
            config.sources.fixtures_dir,
            cli_args.fixtures_dir.clone()
        );
        overlay!(attr, src, "llm_provider", config.llm.provider, cli_args.llm_provider.clone());
        overlay!(attr, src, "model", config.llm.model, cli_args.model.clone());
        overlay!(attr, src, "temperature", config.llm.temperature, cli_args.temperature);

        config.validate()?;

        Ok(config)
    }

    /// Discover the config file for a start directory.
    ///
    /// `ROLECRAFT_HOME/config.toml` wins when it exists. Otherwise walks up the
    /// directory tree looking for `.rolecraft/config.toml`, stopping at
    /// repository root markers (.git, .hg, .svn) or the filesystem root.
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        if let Some(home) = non_empty_env(HOME_ENV_VAR) {
            let candidate = PathBuf::from(home).join("config.toml");
            if candidate.exists() {
                return Ok(Some(candidate));
            }
        }

        let mut current_dir = start_dir;

        loop {
            let config_path = current_dir.join(CONFIG_DIR_NAME).join("config.toml");
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                break;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent,
                None => break,
            }
        }

        Ok(None)
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let parsed: TomlConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(e.to_string()))?;
        Ok(parsed)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::types::{Role, SourceKind};

/// Failure of one workflow execution.
///
/// `WorkflowError` is the single error a caller of the orchestrator sees. Every
/// variant maps to exactly one HTTP status class and one CLI exit code:
///
/// | Variant | Kind label | HTTP | Exit |
/// |---------|------------|------|------|
/// | `ClientInput` | `client_input` | 400 | 2 |
/// | `NotFound` | `not_found` | 404 | 3 |
/// | `Generation` | `generation` | 500 | 70 |
/// | `Unknown` | `unknown` | 500 | 1 |
///
/// None of these are retried anywhere in the workflow.
#[derive(Error, Debug, Clone)]
pub enum WorkflowError {
    /// The caller sent something unusable (today: an unknown role).
    #[error("{0}")]
    ClientInput(String),

    /// An issue or document identifier could not be resolved.
    #[error("{} data not found for ID: {id}", kind_title(*.kind))]
    NotFound { kind: SourceKind, id: String },

    /// The generation stage failed; the wrapped error carries the cause.
    #[error("Failed to generate output: {0}")]
    Generation(#[source] LlmError),

    /// Anything that fits no other category. The original message is kept verbatim.
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

fn kind_title(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Issue => "Issue",
        SourceKind::Document => "Document",
    }
}

impl WorkflowError {
    /// Error returned for any role outside the closed set.
    #[must_use]
    pub fn invalid_role() -> Self {
        let names: Vec<String> = Role::ALL.iter().map(|r| format!("'{r}'")).collect();
        Self::ClientInput(format!("Invalid role: must be {}", names.join(" or ")))
    }

    #[must_use]
    pub fn not_found(kind: SourceKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// HTTP status code the transport should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ClientInput(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Generation(_) | Self::Unknown(_) => 500,
        }
    }

    /// Stable snake_case label used in logs and response bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ClientInput(_) => "client_input",
            Self::NotFound { .. } => "not_found",
            Self::Generation(_) => "generation",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<LlmError> for WorkflowError {
    fn from(err: LlmError) -> Self {
        Self::Generation(err)
    }
}

impl From<SourceError> for WorkflowError {
    fn from(err: SourceError) -> Self {
        Self::NotFound {
            kind: err.kind(),
            id: err.id().to_string(),
        }
    }
}

/// Failure reported by an issue or document provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("{kind} '{id}' does not exist")]
    NotFound { kind: SourceKind, id: String },

    #[error("{kind} '{id}' could not be parsed: {reason}")]
    Malformed {
        kind: SourceKind,
        id: String,
        reason: String,
    },

    #[error("{kind} '{id}' could not be read: {reason}")]
    Io {
        kind: SourceKind,
        id: String,
        reason: String,
    },

    #[error("{kind} lookup for '{id}' timed out after {duration:?}")]
    Timeout {
        kind: SourceKind,
        id: String,
        duration: Duration,
    },
}

impl SourceError {
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::NotFound { kind, .. }
            | Self::Malformed { kind, .. }
            | Self::Io { kind, .. }
            | Self::Timeout { kind, .. } => *kind,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::NotFound { id, .. }
            | Self::Malformed { id, .. }
            | Self::Io { id, .. }
            | Self::Timeout { id, .. } => id,
        }
    }
}

/// Errors from the text-generation backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Transport-level failure (connection refused, DNS, TLS, unreadable body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider authentication failure (401, 403)
    #[error("Provider authentication error: {0}")]
    ProviderAuth(String),

    /// Provider quota/rate limit exceeded (429)
    #[error("Provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// Any other non-success status, with the raw body the provider sent
    #[error("Provider returned status {status}: {message}")]
    ProviderStatus { status: u16, message: String },

    /// Invocation timed out
    #[error("Timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// The call succeeded but carried no usable text
    #[error("No content returned by the generation service")]
    NoContent,

    /// Configuration error
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// Unsupported feature or provider
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    DataSource,
    Generation,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Input => write!(f, "Input"),
            Self::DataSource => write!(f, "Data Source"),
            Self::Generation => write!(f, "Generation"),
            Self::Internal => write!(f, "Internal"),
        }
    }
}

impl UserFriendlyError for WorkflowError {
    fn user_message(&self) -> String {
        match self {
            Self::Generation(inner) => inner.user_message(),
            other => other.to_string(),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ClientInput(_) => vec![
                "Pass --role Tester or --role BusinessAnalyst (case-sensitive)".to_string(),
            ],
            Self::NotFound { kind, id } => vec![
                format!("Check that the {kind} identifier '{id}' exists"),
                "Verify [sources] fixtures_dir points at the right directory".to_string(),
            ],
            Self::Generation(inner) => inner.suggestions(),
            Self::Unknown(_) => vec!["Re-run with --verbose and inspect the logs".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::ClientInput(_) => ErrorCategory::Input,
            Self::NotFound { .. } => ErrorCategory::DataSource,
            Self::Generation(_) => ErrorCategory::Generation,
            Self::Unknown(_) => ErrorCategory::Internal,
        }
    }
}

impl UserFriendlyError for LlmError {
    fn user_message(&self) -> String {
        match self {
            Self::Transport(msg) => format!("LLM transport error: {msg}"),
            Self::ProviderAuth(msg) => format!("LLM provider authentication failed: {msg}"),
            Self::ProviderQuota(msg) => format!("LLM provider quota exceeded: {msg}"),
            Self::ProviderStatus { status, message } => {
                format!("LLM provider returned HTTP {status}: {message}")
            }
            Self::Timeout { duration } => {
                format!("LLM invocation timed out after {duration:?}")
            }
            Self::NoContent => "LLM provider returned no content".to_string(),
            Self::Misconfiguration(msg) => format!("LLM configuration error: {msg}"),
            Self::Unsupported(msg) => format!("LLM feature not supported: {msg}"),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Transport(_) => vec![
                "Check network connectivity to the provider endpoint".to_string(),
                "Verify [llm] base_url if you use a proxy or compatible gateway".to_string(),
            ],
            Self::ProviderAuth(_) => vec![
                "Check that the API key environment variable is set and valid".to_string(),
                "Set [llm] api_key_env if the key lives under a different name".to_string(),
            ],
            Self::ProviderQuota(_) => vec![
                "Wait for the provider rate limit window to reset".to_string(),
            ],
            Self::ProviderStatus { .. } | Self::NoContent => vec![
                "Check the provider status page".to_string(),
                "Try a different [llm] model".to_string(),
            ],
            Self::Timeout { .. } => vec![
                "Increase [llm] timeout_secs or [workflow] generation_timeout_secs".to_string(),
            ],
            Self::Misconfiguration(_) | Self::Unsupported(_) => vec![
                "Review the [llm] section of .rolecraft/config.toml".to_string(),
                "Run 'rolecraft config' to see the effective configuration".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Misconfiguration(_) | Self::Unsupported(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Generation,
        }
    }
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::MissingRequired(key) => format!("Required configuration '{key}' is missing"),
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
            ],
            Self::MissingRequired(key) => vec![format!(
                "Add '{key}' to .rolecraft/config.toml or pass it on the command line"
            )],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "bind" => vec!["Use a socket address such as 127.0.0.1:3000".to_string()],
                "temperature" => vec!["Use a value between 0.0 and 2.0".to_string()],
                "provider" => vec!["Use 'openai' or 'openrouter'".to_string()],
                _ => vec![
                    "Remove the option to use the default value".to_string(),
                ],
            },
            Self::NotFound { .. } => vec![
                "Create .rolecraft/config.toml in your project root".to_string(),
                "Check the path passed to --config".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Render a user-facing error block: message followed by suggestions.
#[must_use]
pub fn display_for_user(err: &dyn UserFriendlyError) -> String {
    let mut out = format!("Error [{}]: {}", err.category(), err.user_message());
    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        out.push_str("\n\nSuggestions:");
        for suggestion in suggestions {
            out.push_str("\n  - ");
            out.push_str(&suggestion);
        }
    }
    out
}

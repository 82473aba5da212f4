//! Shared HTTP client infrastructure for HTTP-based generation providers
//!
//! One `reqwest::Client` is configured per backend and reused for every call.
//! Requests are sent once: there is no retry on any status or network error.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use rolecraft_utils::error::LlmError;
use rolecraft_utils::redaction::redact_error_message;

/// Default maximum HTTP timeout (5 minutes)
const DEFAULT_MAX_HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Default connect timeout (30 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest provider error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 2000;

/// Shared HTTP client for generation providers
#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
    max_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn new() -> Result<Self, LlmError> {
        Self::with_max_timeout(DEFAULT_MAX_HTTP_TIMEOUT)
    }

    /// Create a new HTTP client with a custom maximum timeout
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn with_max_timeout(max_timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                LlmError::Misconfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client: Arc::new(client),
            max_timeout,
        })
    }

    /// Request builder for a POST to `url`.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Execute a request once.
    ///
    /// The effective timeout is `min(request_timeout, max_timeout)`.
    ///
    /// # Errors
    ///
    /// - `LlmError::ProviderAuth` for 401/403
    /// - `LlmError::ProviderQuota` for 429
    /// - `LlmError::ProviderStatus` for any other non-success status, carrying the body
    /// - `LlmError::Timeout` when the deadline elapses
    /// - `LlmError::Transport` for network errors
    pub async fn execute(
        &self,
        request_builder: RequestBuilder,
        request_timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, LlmError> {
        let effective_timeout = request_timeout.min(self.max_timeout);

        let request = request_builder
            .timeout(effective_timeout)
            .build()
            .map_err(|e| LlmError::Transport(format!("Failed to build request: {e}")))?;

        debug!(
            provider = provider_name,
            timeout_secs = effective_timeout.as_secs(),
            "Executing HTTP request"
        );

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout {
                    duration: effective_timeout,
                }
            } else {
                LlmError::Transport(format!(
                    "{provider_name} request failed: {}",
                    redact_error_message(&e.to_string())
                ))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = body_or_placeholder(response.text().await);
        Err(map_error_status(status, &body, provider_name))
    }
}

/// Error body text, or a marker naming the read failure.
pub(crate) fn body_or_placeholder<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

/// Map a non-success status to an `LlmError`
///
/// - 401/403 → `LlmError::ProviderAuth`
/// - 429 → `LlmError::ProviderQuota`
/// - anything else → `LlmError::ProviderStatus` with the redacted raw body
pub(crate) fn map_error_status(status: StatusCode, body: &str, provider_name: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::ProviderAuth(format!("{provider_name} authentication failed: {status}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            LlmError::ProviderQuota(format!("{provider_name} rate limit exceeded: {status}"))
        }
        _ => {
            let trimmed: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
            LlmError::ProviderStatus {
                status: status.as_u16(),
                message: redact_error_message(&trimmed),
            }
        }
    }
}

//! Logging and observability infrastructure for rolecraft
//!
//! Structured logging via `tracing`, with a compact human format by default and
//! a JSON format for log shippers. All error text passes through the redactor
//! before it is written.

use std::io::IsTerminal;
use tracing::{Level, debug, error, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::redaction::redact_error_message;
use crate::types::WorkflowStage;

/// Environment variable holding a filter directive that overrides everything else.
pub const LOG_ENV_VAR: &str = "ROLECRAFT_LOG";

/// Check if colored output should be used.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Filter directive used when neither the environment nor configuration supplies one.
#[must_use]
pub fn default_filter_directive(verbose: bool) -> &'static str {
    if verbose {
        "rolecraft=debug,info"
    } else {
        "rolecraft=info,warn"
    }
}

/// Resolve the active filter.
///
/// Order: `ROLECRAFT_LOG`, then `RUST_LOG`, then the configured `level`, then
/// the verbosity default.
fn resolve_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| match level {
            Some(directive) => EnvFilter::try_new(directive),
            None => EnvFilter::try_new(default_filter_directive(verbose)),
        })
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing subscriber.
///
/// # Arguments
/// * `verbose` - include targets and span close events
/// * `json` - emit one JSON object per event instead of the compact format
/// * `level` - configured filter directive, used when no env filter is set
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(
    verbose: bool,
    json: bool,
    level: Option<&str>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = resolve_filter(verbose, level);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(use_color())
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(use_color())
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Span wrapping one workflow execution.
pub fn workflow_span(role: &str, issue_id: &str, document_id: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "workflow",
        role = %role,
        issue_id = %issue_id,
        document_id = %document_id,
    )
}

pub fn log_stage_transition(from: WorkflowStage, to: WorkflowStage) {
    debug!(from = %from, to = %to, "Workflow stage transition");
}

pub fn log_workflow_complete(output_len: usize, duration_ms: u128) {
    info!(
        output_len = output_len,
        duration_ms = %duration_ms,
        "Workflow completed"
    );
}

/// Log a failed stage. The error text is redacted first.
pub fn log_stage_failure(stage: WorkflowStage, kind: &str, error: &str, duration_ms: u128) {
    let sanitized = redact_error_message(error);
    error!(
        stage = %stage,
        kind = %kind,
        error = %sanitized,
        duration_ms = %duration_ms,
        "Workflow failed"
    );
}

/// A request body the transport refused before any workflow ran.
pub fn log_rejected_request(kind: &str, error: &str) {
    let sanitized = redact_error_message(error);
    error!(kind = %kind, error = %sanitized, "Request rejected");
}

/// One access-log line per HTTP request.
pub fn log_request(method: &str, path: &str, status: u16, duration_ms: u128) {
    info!(
        method = %method,
        path = %path,
        status = status,
        duration_ms = %duration_ms,
        "Handled request"
    );
}

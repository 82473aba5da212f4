//! Command implementations for `serve`, `generate` and `config`.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::server;
use crate::{Config, WorkflowError, WorkflowOrchestrator, WorkflowOutcome};

/// Start the HTTP transport and block until Ctrl-C.
pub async fn execute_serve_command(config: &Config) -> Result<()> {
    let orchestrator = Arc::new(WorkflowOrchestrator::from_config(config)?);
    let listener = server::bind(config.bind()).await?;
    server::serve(listener, orchestrator, shutdown_signal())
        .await
        .context("HTTP server terminated")?;
    tracing::info!("rolecraft stopped");
    Ok(())
}

/// Run one workflow and print its output, or the JSON envelope with `--json`.
///
/// The generation backend is built on the first generate call, after role
/// validation and both fetches. A failed workflow is returned as a [`WorkflowError`] inside the
/// `anyhow::Error` so the caller can pick the exit code.
pub async fn execute_generate_command(
    role: &str,
    issue_id: &str,
    document_id: &str,
    json: bool,
    config: &Config,
) -> Result<()> {
    let orchestrator = WorkflowOrchestrator::from_config_deferred(config);
    let result = orchestrator.run(role, issue_id, document_id).await;

    if json {
        let rendered = serde_json::to_string_pretty(&generate_envelope(&result))
            .context("Failed to emit generate JSON")?;
        println!("{rendered}");
    }

    let outcome = result?;
    if !json {
        println!("{}", outcome.output);
    }
    Ok(())
}

/// Print the effective configuration with source attribution.
pub fn execute_config_command(config: &Config) -> Result<()> {
    print!("{}", render_effective_config(config));
    Ok(())
}

/// The same envelope the HTTP transport returns for a workflow result.
pub fn generate_envelope(result: &Result<WorkflowOutcome, WorkflowError>) -> Value {
    match result {
        Ok(outcome) => json!({
            "success": true,
            "data": {
                "role": outcome.role.as_str(),
                "jiraId": outcome.issue_id,
                "confId": outcome.document_id,
                "output": outcome.output,
            }
        }),
        Err(err) => json!({
            "success": false,
            "error": err.to_string(),
            "kind": err.kind(),
        }),
    }
}

/// One `key = value  (source)` line per setting, sorted by key.
pub fn render_effective_config(config: &Config) -> String {
    let effective = config.effective_config();
    let width = effective.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::from("Effective configuration:\n");
    for (key, (value, source)) in &effective {
        let _ = writeln!(out, "  {key:<width$} = {value}  ({source})");
    }
    out
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

//! rolecraft - role-aware generation from issues and linked documents
//!
//! Given a role, an issue identifier and a linked-document identifier,
//! rolecraft fetches both records concurrently, assembles a role-specific
//! prompt and asks a generation service for the result: test cases for a
//! `Tester`, user stories for a `BusinessAnalyst`.
//!
//! rolecraft can be used in two ways:
//! - **CLI / server**: `rolecraft serve` exposes the HTTP API,
//!   `rolecraft generate` runs one workflow from the command line
//! - **Library**: build a [`WorkflowOrchestrator`] from any providers and
//!   generation client and call [`WorkflowOrchestrator::execute`]
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Serve the HTTP API on 127.0.0.1:3000
//! rolecraft serve
//!
//! # Run a single workflow
//! rolecraft generate --role Tester --issue DEMO1 --document DOC1
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use rolecraft::{Config, WorkflowOrchestrator};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::builder().fixtures_dir("mocks").build()?;
//! let orchestrator = WorkflowOrchestrator::from_config(&config)?;
//! let outcome = orchestrator.run("Tester", "DEMO1", "DOC1").await?;
//! println!("{}", outcome.output);
//! # Ok(())
//! # }
//! ```
//!
//! # HTTP API
//!
//! - `GET /health` returns `{"status":"healthy"}`
//! - `POST /api/prompts/generate` with `{role, jiraId, confId}` returns
//!   `{"success":true,"data":{role, jiraId, confId, output}}` or
//!   `{"success":false,"error":..,"kind":..}` with status 400, 404 or 500

// ============================================================================
// Stable Public API
// ============================================================================

/// Configuration with discovery and precedence:
/// CLI arguments > environment > config file > built-in defaults.
///
/// Use [`Config::discover()`] for CLI-like behavior or [`Config::builder()`]
/// for programmatic configuration.
pub use rolecraft_config::Config;

/// Builder for programmatic configuration.
///
/// # Example
///
/// ```rust
/// use rolecraft::Config;
/// use std::time::Duration;
///
/// let config = Config::builder()
///     .bind("127.0.0.1:8080")
///     .fetch_timeout(Duration::from_secs(5))
///     .build()
///     .expect("Failed to build config");
/// assert_eq!(config.bind(), "127.0.0.1:8080");
/// ```
pub use rolecraft_config::ConfigBuilder;

/// CLI argument structure for configuration override.
pub use rolecraft_config::CliArgs;

/// Runs the role-based workflow to a terminal [`WorkflowState`].
pub use rolecraft_orchestrator::{
    StageTimeouts, WorkflowOrchestrator, WorkflowOutcome, WorkflowState,
};

/// Workflow failure taxonomy; [`WorkflowError::status_code`] gives the HTTP
/// status and [`ExitCode::from`] the process exit code.
pub use rolecraft_utils::error::WorkflowError;

pub use rolecraft_utils::error::{ErrorCategory, UserFriendlyError};
pub use rolecraft_utils::exit_codes::ExitCode;
pub use rolecraft_utils::types::{DocumentData, IssueData, Role, WorkflowStage};

/// Seams for plugging in other data sources and generation backends.
pub use rolecraft_llm::GenerationClient;
pub use rolecraft_sources::{DocumentProvider, IssueProvider};

// ============================================================================
// Internal modules - accessible but not stable
// ============================================================================

#[doc(hidden)]
pub use rolecraft_config as config;
#[doc(hidden)]
pub use rolecraft_llm as llm;
#[doc(hidden)]
pub use rolecraft_prompt_template as prompt_template;
#[doc(hidden)]
pub use rolecraft_sources as sources;
#[doc(hidden)]
pub use rolecraft_utils::{logging, redaction};

#[doc(hidden)]
pub mod cli;
pub mod server;

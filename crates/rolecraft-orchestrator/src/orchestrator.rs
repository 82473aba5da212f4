use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use rolecraft_config::Config;
use rolecraft_llm::{DeferredClient, GenerationClient};
use rolecraft_prompt_template::assemble;
use rolecraft_sources::{DocumentProvider, FileDocumentProvider, FileIssueProvider, IssueProvider};
use rolecraft_utils::error::{LlmError, SourceError, WorkflowError};
use rolecraft_utils::logging::{
    log_stage_failure, log_stage_transition, log_workflow_complete, workflow_span,
};
use rolecraft_utils::types::{Role, SourceKind, WorkflowStage};

use crate::state::{WorkflowOutcome, WorkflowState};

/// Optional upper bounds on the suspending stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimeouts {
    /// Applied to each of the two concurrent fetches.
    pub fetch: Option<Duration>,
    pub generation: Option<Duration>,
}

impl StageTimeouts {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            fetch: config.fetch_timeout(),
            generation: config.generation_timeout(),
        }
    }
}

/// Runs the role-based generation workflow.
///
/// Stages, strictly ordered, short-circuiting on the first failure:
///
/// 1. validate the role (before any I/O)
/// 2. fetch issue and document concurrently
/// 3. assemble the role-specific prompt
/// 4. call the generation client once
///
/// The orchestrator holds no per-request state and can be shared behind an
/// `Arc` across any number of concurrent executions.
#[derive(Clone)]
pub struct WorkflowOrchestrator {
    issues: Arc<dyn IssueProvider>,
    documents: Arc<dyn DocumentProvider>,
    generator: Arc<dyn GenerationClient>,
    timeouts: StageTimeouts,
}

impl std::fmt::Debug for WorkflowOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowOrchestrator")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl WorkflowOrchestrator {
    pub fn new(
        issues: Arc<dyn IssueProvider>,
        documents: Arc<dyn DocumentProvider>,
        generator: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            issues,
            documents,
            generator,
            timeouts: StageTimeouts::default(),
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Wire file-backed providers and the configured generation backend.
    ///
    /// # Errors
    ///
    /// Propagates backend construction failures (unknown provider, missing key).
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let generator: Arc<dyn GenerationClient> = Arc::from(rolecraft_llm::from_config(config)?);
        let dir = config.fixtures_dir();
        Ok(Self::new(
            Arc::new(FileIssueProvider::new(dir)),
            Arc::new(FileDocumentProvider::new(dir)),
            generator,
        )
        .with_timeouts(StageTimeouts::from_config(config)))
    }

    /// Like [`from_config`](Self::from_config), but the generation backend
    /// is built on the first generate call. Role and fetch failures are
    /// reported as such even when the backend could not be built.
    #[must_use]
    pub fn from_config_deferred(config: &Config) -> Self {
        let dir = config.fixtures_dir();
        Self::new(
            Arc::new(FileIssueProvider::new(dir)),
            Arc::new(FileDocumentProvider::new(dir)),
            Arc::new(DeferredClient::new(config.clone())),
        )
        .with_timeouts(StageTimeouts::from_config(config))
    }

    #[must_use]
    pub fn timeouts(&self) -> StageTimeouts {
        self.timeouts
    }

    /// Run one workflow to a terminal state.
    ///
    /// Never panics on collaborator failure and never returns a non-terminal
    /// state: the result carries either `output` or `error`.
    pub async fn execute(&self, role: &str, issue_id: &str, document_id: &str) -> WorkflowState {
        let span = workflow_span(role, issue_id, document_id);
        self.execute_stages(role, issue_id, document_id)
            .instrument(span)
            .await
    }

    /// [`execute`](Self::execute) folded into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`WorkflowError`] of the failed stage.
    pub async fn run(
        &self,
        role: &str,
        issue_id: &str,
        document_id: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        self.execute(role, issue_id, document_id)
            .await
            .into_result()
    }

    async fn execute_stages(
        &self,
        raw_role: &str,
        issue_id: &str,
        document_id: &str,
    ) -> WorkflowState {
        let started = Instant::now();
        let mut state = WorkflowState::new(raw_role, issue_id, document_id);

        let role = match Role::parse(raw_role) {
            Ok(role) => role,
            Err(err) => return fail(state, err, None, started),
        };

        transition(&mut state, WorkflowStage::Fetching);
        let (issue, document) = tokio::join!(
            self.fetch_issue(issue_id),
            self.fetch_document(document_id)
        );

        // Keep whatever succeeded; the issue failure wins when both fail.
        let issue = issue.map(|data| {
            state.set_issue_data(data.clone());
            data
        });
        let document = document.map(|data| {
            state.set_document_data(data.clone());
            data
        });
        let (issue, document) = match (issue, document) {
            (Ok(issue), Ok(document)) => (issue, document),
            (Err(err), _) | (Ok(_), Err(err)) => {
                let detail = err.to_string();
                return fail(state, WorkflowError::from(err), Some(detail), started);
            }
        };

        transition(&mut state, WorkflowStage::Routing);
        let prompt = assemble(role, &issue, &document);

        transition(&mut state, WorkflowStage::Generating);
        match self.generate(&prompt).await {
            Ok(output) => {
                log_workflow_complete(output.len(), started.elapsed().as_millis());
                state.complete(output)
            }
            Err(err) => fail(state, WorkflowError::Generation(err), None, started),
        }
    }

    async fn fetch_issue(&self, id: &str) -> Result<rolecraft_utils::IssueData, SourceError> {
        bounded_fetch(self.issues.fetch(id), self.timeouts.fetch, SourceKind::Issue, id).await
    }

    async fn fetch_document(&self, id: &str) -> Result<rolecraft_utils::DocumentData, SourceError> {
        bounded_fetch(
            self.documents.fetch(id),
            self.timeouts.fetch,
            SourceKind::Document,
            id,
        )
        .await
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let call = self.generator.generate(prompt);
        let output = match self.timeouts.generation {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| LlmError::Timeout { duration: limit })??,
            None => call.await?,
        };
        // Blank text from any client counts as no content
        if output.trim().is_empty() {
            return Err(LlmError::NoContent);
        }
        Ok(output)
    }
}

async fn bounded_fetch<T>(
    fetch: impl Future<Output = Result<T, SourceError>>,
    limit: Option<Duration>,
    kind: SourceKind,
    id: &str,
) -> Result<T, SourceError> {
    match limit {
        Some(duration) => tokio::time::timeout(duration, fetch)
            .await
            .unwrap_or_else(|_| {
                Err(SourceError::Timeout {
                    kind,
                    id: id.to_string(),
                    duration,
                })
            }),
        None => fetch.await,
    }
}

fn transition(state: &mut WorkflowState, next: WorkflowStage) {
    log_stage_transition(state.stage(), next);
    state.advance(next);
}

fn fail(
    state: WorkflowState,
    error: WorkflowError,
    detail: Option<String>,
    started: Instant,
) -> WorkflowState {
    let message = match detail {
        Some(detail) => format!("{error} ({detail})"),
        None => error.to_string(),
    };
    log_stage_failure(
        state.stage(),
        error.kind(),
        &message,
        started.elapsed().as_millis(),
    );
    state.fail(error)
}

//! In-memory collaborators with call counters, for tests.
//!
//! Test seam; not part of public API stability guarantees.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rolecraft_llm::GenerationClient;
use rolecraft_sources::{DocumentProvider, IssueProvider};
use rolecraft_utils::error::{LlmError, SourceError};
use rolecraft_utils::types::{DocumentData, IssueData, SourceKind};

use crate::WorkflowOrchestrator;

/// The issue used throughout the workflow scenarios (`DEMO1`).
#[must_use]
pub fn demo_issue() -> IssueData {
    IssueData {
        summary: "Test Issue".to_string(),
        description: "desc".to_string(),
        acceptance_criteria: vec!["AC1".to_string(), "AC2".to_string()],
    }
}

/// The document used throughout the workflow scenarios (`DOC1`).
#[must_use]
pub fn demo_document() -> DocumentData {
    DocumentData {
        title: "Doc".to_string(),
        body: "body text".to_string(),
    }
}

/// Serves a fixed set of issues.
#[derive(Debug, Default)]
pub struct StaticIssueProvider {
    issues: HashMap<String, IssueData>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticIssueProvider {
    #[must_use]
    pub fn with(mut self, id: &str, issue: IssueData) -> Self {
        self.issues.insert(id.to_string(), issue);
        self
    }

    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IssueProvider for StaticIssueProvider {
    async fn fetch(&self, issue_id: &str) -> Result<IssueData, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.issues
            .get(issue_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                kind: SourceKind::Issue,
                id: issue_id.to_string(),
            })
    }
}

/// Serves a fixed set of documents.
#[derive(Debug, Default)]
pub struct StaticDocumentProvider {
    documents: HashMap<String, DocumentData>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticDocumentProvider {
    #[must_use]
    pub fn with(mut self, id: &str, document: DocumentData) -> Self {
        self.documents.insert(id.to_string(), document);
        self
    }

    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentProvider for StaticDocumentProvider {
    async fn fetch(&self, document_id: &str) -> Result<DocumentData, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                kind: SourceKind::Document,
                id: document_id.to_string(),
            })
    }
}

/// Returns a scripted reply and records every prompt it receives.
#[derive(Debug)]
pub struct ScriptedGenerator {
    reply: Result<String, LlmError>,
    delay: Duration,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_result(Ok(text.into()))
    }

    pub fn failing(error: LlmError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(reply: Result<String, LlmError>) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}

/// Orchestrator plus handles to its stand-ins.
pub struct Harness {
    pub orchestrator: WorkflowOrchestrator,
    pub issues: Arc<StaticIssueProvider>,
    pub documents: Arc<StaticDocumentProvider>,
    pub generator: Arc<ScriptedGenerator>,
}

impl Harness {
    /// Wire the given stand-ins into an orchestrator.
    pub fn new(
        issues: StaticIssueProvider,
        documents: StaticDocumentProvider,
        generator: ScriptedGenerator,
    ) -> Self {
        let issues = Arc::new(issues);
        let documents = Arc::new(documents);
        let generator = Arc::new(generator);
        let orchestrator =
            WorkflowOrchestrator::new(issues.clone(), documents.clone(), generator.clone());
        Self {
            orchestrator,
            issues,
            documents,
            generator,
        }
    }

    /// `DEMO1` / `DOC1` available, generator replying with `reply`.
    pub fn demo(reply: &str) -> Self {
        Self::new(
            StaticIssueProvider::default().with("DEMO1", demo_issue()),
            StaticDocumentProvider::default().with("DOC1", demo_document()),
            ScriptedGenerator::replying(reply),
        )
    }

    pub fn fetch_calls(&self) -> usize {
        self.issues.calls() + self.documents.calls()
    }
}

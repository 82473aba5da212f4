//! Issue and document data providers
//!
//! The orchestrator only sees the [`IssueProvider`] and [`DocumentProvider`]
//! traits. The file-backed implementations in [`file`] read JSON fixtures and
//! are what `rolecraft serve` wires up by default.

pub mod file;

use async_trait::async_trait;

use rolecraft_utils::error::SourceError;
use rolecraft_utils::types::{DocumentData, IssueData};

pub use file::{FileDocumentProvider, FileIssueProvider};

/// Resolves an issue identifier to its content.
#[async_trait]
pub trait IssueProvider: Send + Sync {
    /// Fetch the issue. Unknown identifiers yield [`SourceError::NotFound`].
    async fn fetch(&self, issue_id: &str) -> Result<IssueData, SourceError>;
}

/// Resolves a document identifier to its content.
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Fetch the document. Unknown identifiers yield [`SourceError::NotFound`].
    async fn fetch(&self, document_id: &str) -> Result<DocumentData, SourceError>;
}

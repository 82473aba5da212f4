//! File-backed providers reading `JIRA-<id>.json` and `CONFLUENCE-<id>.json`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use rolecraft_utils::error::SourceError;
use rolecraft_utils::types::{DocumentData, IssueData, SourceKind};

use crate::{DocumentProvider, IssueProvider};

/// File name prefix for issue fixtures
pub const ISSUE_FILE_PREFIX: &str = "JIRA-";

/// File name prefix for document fixtures
pub const DOCUMENT_FILE_PREFIX: &str = "CONFLUENCE-";

/// Reject identifiers that could escape the fixture directory.
fn check_id(kind: SourceKind, id: &str) -> Result<(), SourceError> {
    let bad = id.is_empty()
        || id.contains("..")
        || id.contains('/')
        || id.contains('\\')
        || id.contains('\0');
    if bad {
        return Err(SourceError::NotFound {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

async fn read_fixture<T: DeserializeOwned>(
    dir: &Path,
    prefix: &str,
    kind: SourceKind,
    id: &str,
) -> Result<T, SourceError> {
    check_id(kind, id)?;
    let path = dir.join(format!("{prefix}{id}.json"));

    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                kind,
                id: id.to_string(),
            },
            _ => SourceError::Io {
                kind,
                id: id.to_string(),
                reason: e.to_string(),
            },
        })?;

    serde_json::from_str(&raw).map_err(|e| SourceError::Malformed {
        kind,
        id: id.to_string(),
        reason: e.to_string(),
    })
}

fn log_result<T>(kind: SourceKind, id: &str, result: &Result<T, SourceError>) {
    match result {
        Ok(_) => info!(kind = %kind, id = %id, "Fetched {kind} data"),
        Err(e) => error!(kind = %kind, id = %id, error = %e, "Failed to fetch {kind} data"),
    }
}

/// Serves issues from `<dir>/JIRA-<id>.json`.
#[derive(Debug, Clone)]
pub struct FileIssueProvider {
    dir: PathBuf,
}

impl FileIssueProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl IssueProvider for FileIssueProvider {
    async fn fetch(&self, issue_id: &str) -> Result<IssueData, SourceError> {
        let result = read_fixture(&self.dir, ISSUE_FILE_PREFIX, SourceKind::Issue, issue_id).await;
        log_result(SourceKind::Issue, issue_id, &result);
        result
    }
}

/// Serves documents from `<dir>/CONFLUENCE-<id>.json`.
#[derive(Debug, Clone)]
pub struct FileDocumentProvider {
    dir: PathBuf,
}

impl FileDocumentProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DocumentProvider for FileDocumentProvider {
    async fn fetch(&self, document_id: &str) -> Result<DocumentData, SourceError> {
        let result = read_fixture(
            &self.dir,
            DOCUMENT_FILE_PREFIX,
            SourceKind::Document,
            document_id,
        )
        .await;
        log_result(SourceKind::Document, document_id, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixtures() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("JIRA-DEMO1.json"),
            r#"{"summary":"Test Issue","description":"desc","acceptanceCriteria":["AC1","AC2"]}"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("CONFLUENCE-DOC1.json"),
            r#"{"title":"Doc","body":"body text"}"#,
        )
        .unwrap();
        fs::write(temp.path().join("JIRA-BROKEN.json"), "{ not json").unwrap();
        temp
    }

    #[tokio::test]
    async fn test_fetch_issue_fixture() {
        let temp = fixtures();
        let provider = FileIssueProvider::new(temp.path());

        let issue = provider.fetch("DEMO1").await.unwrap();
        assert_eq!(issue.summary, "Test Issue");
        assert_eq!(issue.acceptance_criteria, vec!["AC1", "AC2"]);
    }

    #[tokio::test]
    async fn test_fetch_document_fixture() {
        let temp = fixtures();
        let provider = FileDocumentProvider::new(temp.path());

        let doc = provider.fetch("DOC1").await.unwrap();
        assert_eq!(doc.title, "Doc");
        assert_eq!(doc.body, "body text");
    }

    #[tokio::test]
    async fn test_missing_fixture_is_not_found() {
        let temp = fixtures();
        let provider = FileIssueProvider::new(temp.path());

        match provider.fetch("MISSING").await {
            Err(SourceError::NotFound { kind, id }) => {
                assert_eq!(kind, SourceKind::Issue);
                assert_eq!(id, "MISSING");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_fixture_is_reported() {
        let temp = fixtures();
        let provider = FileIssueProvider::new(temp.path());

        match provider.fetch("BROKEN").await {
            Err(SourceError::Malformed { id, .. }) => assert_eq!(id, "BROKEN"),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_traversal_ids_are_rejected() {
        let temp = fixtures();
        let nested = temp.path().join("inner");
        fs::create_dir_all(&nested).unwrap();
        let provider = FileDocumentProvider::new(&nested);

        for id in ["", "../DOC1", "..", "a/b", "a\\b"] {
            let err = provider.fetch(id).await.unwrap_err();
            assert!(
                matches!(err, SourceError::NotFound { .. }),
                "{id:?} should be rejected, got {err:?}"
            );
        }
    }
}

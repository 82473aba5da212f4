//! End-to-end workflow scenarios over file-backed providers
//!
//! Fixtures are written to a temp dir in the `JIRA-<id>.json` /
//! `CONFLUENCE-<id>.json` layout; generation is a scripted stand-in so the
//! assembled prompt can be inspected.

use std::path::Path;
use std::sync::Arc;

use rolecraft::sources::{FileDocumentProvider, FileIssueProvider};
use rolecraft::{Role, WorkflowError, WorkflowOrchestrator, WorkflowStage};
use rolecraft_orchestrator::test_support::ScriptedGenerator;
use rolecraft_utils::error::LlmError;
use rolecraft_utils::types::SourceKind;
use tempfile::TempDir;

fn write_demo_fixtures(dir: &Path) {
    std::fs::write(
        dir.join("JIRA-DEMO1.json"),
        r#"{
            "summary": "Test Issue",
            "description": "desc",
            "acceptanceCriteria": ["AC1", "AC2"]
        }"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("CONFLUENCE-DOC1.json"),
        r#"{ "title": "Doc", "body": "body text" }"#,
    )
    .unwrap();
}

struct Scenario {
    fixtures: TempDir,
    orchestrator: WorkflowOrchestrator,
    generator: Arc<ScriptedGenerator>,
}

fn scenario(generator: ScriptedGenerator) -> Scenario {
    let fixtures = TempDir::new().unwrap();
    write_demo_fixtures(fixtures.path());
    let generator = Arc::new(generator);
    let orchestrator = WorkflowOrchestrator::new(
        Arc::new(FileIssueProvider::new(fixtures.path())),
        Arc::new(FileDocumentProvider::new(fixtures.path())),
        generator.clone(),
    );
    Scenario {
        fixtures,
        orchestrator,
        generator,
    }
}

#[tokio::test]
async fn test_tester_gets_test_cases_with_acceptance_criteria() {
    let s = scenario(ScriptedGenerator::replying("Generated test cases text"));

    let state = s.orchestrator.execute("Tester", "DEMO1", "DOC1").await;

    assert_eq!(state.stage(), WorkflowStage::Done);
    assert_eq!(state.output(), Some("Generated test cases text"));
    assert!(state.error().is_none());

    let prompt = &s.generator.prompts()[0];
    assert!(prompt.starts_with("You are a QA engineer."));
    assert!(prompt.contains("JIRA Summary: Test Issue"));
    assert!(prompt.contains("JIRA Acceptance Criteria: AC1\nAC2"));
    assert!(prompt.contains("Confluence Page Title: Doc"));
    assert!(prompt.ends_with("Generate a comprehensive set of test cases:"));
}

#[tokio::test]
async fn test_business_analyst_gets_user_stories_without_criteria() {
    let s = scenario(ScriptedGenerator::replying("Generated user stories"));

    let outcome = s
        .orchestrator
        .run("BusinessAnalyst", "DEMO1", "DOC1")
        .await
        .unwrap();

    assert_eq!(outcome.role, Role::BusinessAnalyst);
    assert_eq!(outcome.output, "Generated user stories");
    let prompt = &s.generator.prompts()[0];
    assert!(!prompt.contains("AC1"));
    assert!(!prompt.contains("AC2"));
    assert!(prompt.ends_with("Generate detailed user stories and acceptance criteria:"));
}

#[tokio::test]
async fn test_unknown_role_is_client_input_without_generation() {
    let s = scenario(ScriptedGenerator::replying("unused"));

    let err = s
        .orchestrator
        .run("Manager", "DEMO1", "DOC1")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(
        err.to_string(),
        "Invalid role: must be 'Tester' or 'BusinessAnalyst'"
    );
    assert_eq!(s.generator.calls(), 0);
}

#[tokio::test]
async fn test_missing_issue_fixture_is_not_found() {
    let s = scenario(ScriptedGenerator::replying("unused"));

    let state = s.orchestrator.execute("Tester", "MISSING", "DOC1").await;

    match state.error() {
        Some(WorkflowError::NotFound { kind, id }) => {
            assert_eq!(*kind, SourceKind::Issue);
            assert_eq!(id, "MISSING");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(state.error().map(WorkflowError::status_code), Some(404));
    assert_eq!(s.generator.calls(), 0);
}

#[tokio::test]
async fn test_malformed_fixture_is_reported_as_not_found() {
    let s = scenario(ScriptedGenerator::replying("unused"));
    std::fs::write(
        s.fixtures.path().join("CONFLUENCE-BROKEN.json"),
        "{ not json",
    )
    .unwrap();

    let err = s
        .orchestrator
        .run("Tester", "DEMO1", "BROKEN")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::NotFound { kind: SourceKind::Document, ref id } if id == "BROKEN"
    ));
}

#[tokio::test]
async fn test_traversal_identifier_never_leaves_fixture_dir() {
    let s = scenario(ScriptedGenerator::replying("unused"));

    let err = s
        .orchestrator
        .run("Tester", "../JIRA-DEMO1", "DOC1")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "not_found");
    assert_eq!(s.generator.calls(), 0);
}

#[tokio::test]
async fn test_blank_generation_fails_with_no_content() {
    let s = scenario(ScriptedGenerator::replying("  \n"));

    let state = s.orchestrator.execute("Tester", "DEMO1", "DOC1").await;

    assert_eq!(state.stage(), WorkflowStage::Failed);
    assert_eq!(state.failed_stage(), Some(WorkflowStage::Generating));
    assert!(matches!(
        state.error(),
        Some(WorkflowError::Generation(LlmError::NoContent))
    ));
    assert!(state.output().is_none());
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let s = scenario(ScriptedGenerator::replying("same every time"));

    let first = s.orchestrator.run("Tester", "DEMO1", "DOC1").await.unwrap();
    let second = s.orchestrator.run("Tester", "DEMO1", "DOC1").await.unwrap();

    assert_eq!(first, second);
    let prompts = s.generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
}

#[tokio::test]
async fn test_shared_orchestrator_serves_concurrent_requests() {
    let s = scenario(ScriptedGenerator::replying("ok"));
    let orchestrator = Arc::new(s.orchestrator);

    let mut handles = Vec::new();
    for role in ["Tester", "BusinessAnalyst", "Tester", "Nobody"] {
        let orchestrator = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            orchestrator.run(role, "DEMO1", "DOC1").await
        }));
    }

    let mut ok = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(outcome) => {
                assert_eq!(outcome.output, "ok");
                ok += 1;
            }
            Err(WorkflowError::ClientInput(_)) => rejected += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(ok, 3);
    assert_eq!(rejected, 1);
    assert_eq!(s.generator.calls(), 3);
}

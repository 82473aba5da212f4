//! HTTP transport tests
//!
//! The real router is bound on an ephemeral port and driven with reqwest.
//! Collaborators are the in-memory stand-ins from the orchestrator crate.

use std::net::SocketAddr;
use std::sync::Arc;

use rolecraft::server;
use rolecraft_orchestrator::test_support::{
    Harness, ScriptedGenerator, StaticDocumentProvider, StaticIssueProvider, demo_document,
    demo_issue,
};
use rolecraft_utils::error::LlmError;
use serde_json::{Value, json};

struct TestServer {
    addr: SocketAddr,
    harness: Harness,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(harness: Harness) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let orchestrator = Arc::new(harness.orchestrator.clone());
        tokio::spawn(server::serve(
            listener,
            orchestrator,
            std::future::pending::<()>(),
        ));
        Self {
            addr,
            harness,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn generate(&self, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(server::GENERATE_PATH))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start(Harness::demo("unused")).await;

    let response = server
        .client
        .get(server.url(server::HEALTH_PATH))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_generate_success_envelope() {
    let server = TestServer::start(Harness::demo("Generated test cases text")).await;

    let (status, body) = server
        .generate(json!({ "role": "Tester", "jiraId": "DEMO1", "confId": "DOC1" }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": {
                "role": "Tester",
                "jiraId": "DEMO1",
                "confId": "DOC1",
                "output": "Generated test cases text"
            }
        })
    );
}

#[tokio::test]
async fn test_generate_accepts_alias_field_names() {
    let server = TestServer::start(Harness::demo("stories")).await;

    let (status, body) = server
        .generate(json!({ "role": "BusinessAnalyst", "issueId": "DEMO1", "documentId": "DOC1" }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["data"]["role"], "BusinessAnalyst");
    assert_eq!(body["data"]["output"], "stories");
}

#[tokio::test]
async fn test_invalid_role_is_400() {
    let server = TestServer::start(Harness::demo("unused")).await;

    let (status, body) = server
        .generate(json!({ "role": "Manager", "jiraId": "DEMO1", "confId": "DOC1" }))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "client_input");
    assert_eq!(
        body["error"],
        "Invalid role: must be 'Tester' or 'BusinessAnalyst'"
    );
    assert_eq!(server.harness.fetch_calls(), 0);
    assert_eq!(server.harness.generator.calls(), 0);
}

#[tokio::test]
async fn test_missing_document_is_404() {
    let server = TestServer::start(Harness::demo("unused")).await;

    let (status, body) = server
        .generate(json!({ "role": "Tester", "jiraId": "DEMO1", "confId": "NOPE" }))
        .await;

    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "not_found");
    assert_eq!(body["error"], "Document data not found for ID: NOPE");
}

#[tokio::test]
async fn test_generation_failure_is_500() {
    let harness = Harness::new(
        StaticIssueProvider::default().with("DEMO1", demo_issue()),
        StaticDocumentProvider::default().with("DOC1", demo_document()),
        ScriptedGenerator::failing(LlmError::Transport("connection reset".to_string())),
    );
    let server = TestServer::start(harness).await;

    let (status, body) = server
        .generate(json!({ "role": "Tester", "jiraId": "DEMO1", "confId": "DOC1" }))
        .await;

    assert_eq!(status, 500);
    assert_eq!(body["kind"], "generation");
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to generate output:")
    );
    assert_eq!(server.harness.generator.calls(), 1);
}

#[tokio::test]
async fn test_missing_field_is_400() {
    let server = TestServer::start(Harness::demo("unused")).await;

    let (status, body) = server
        .generate(json!({ "role": "Tester", "jiraId": "DEMO1" }))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["kind"], "client_input");
    assert_eq!(server.harness.fetch_calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let server = TestServer::start(Harness::demo("unused")).await;

    let response = server
        .client
        .post(server.url(server::GENERATE_PATH))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "client_input");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = TestServer::start(Harness::demo("unused")).await;

    let response = server
        .client
        .get(server.url("/api/nothing-here"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "success": false, "message": "Resource not found" })
    );
}

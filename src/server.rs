//! HTTP transport
//!
//! Thin axum layer over [`WorkflowOrchestrator`]: one `execute` per request,
//! errors rendered as the `{success, error, kind}` envelope with the status
//! the error maps to.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use rolecraft_orchestrator::{WorkflowError, WorkflowOrchestrator, WorkflowOutcome};
use rolecraft_utils::logging::{log_rejected_request, log_request};
use rolecraft_utils::types::Role;

pub const HEALTH_PATH: &str = "/health";
pub const GENERATE_PATH: &str = "/api/prompts/generate";

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<WorkflowOrchestrator>,
}

/// Body of `POST /api/prompts/generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub role: String,
    #[serde(alias = "issueId")]
    pub jira_id: String,
    #[serde(alias = "documentId")]
    pub conf_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateData {
    role: Role,
    jira_id: String,
    conf_id: String,
    output: String,
}

impl From<WorkflowOutcome> for GenerateData {
    fn from(outcome: WorkflowOutcome) -> Self {
        Self {
            role: outcome.role,
            jira_id: outcome.issue_id,
            conf_id: outcome.document_id,
            output: outcome.output,
        }
    }
}

#[derive(Debug, Serialize)]
struct SuccessBody {
    success: bool,
    data: GenerateData,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct NotFoundBody {
    success: bool,
    message: &'static str,
}

/// Wraps a [`WorkflowError`] so handlers can return it directly.
struct ApiError(WorkflowError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            success: false,
            error: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        let error = match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => {
                WorkflowError::ClientInput(format!("Invalid request body: {detail}"))
            }
            _ => WorkflowError::Unknown(detail),
        };
        log_rejected_request(error.kind(), &error.to_string());
        Self(error)
    }
}

/// Build the router. Exposed separately from [`serve`] so tests can bind
/// their own listener.
pub fn router(orchestrator: Arc<WorkflowOrchestrator>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(GENERATE_PATH, post(generate))
        .fallback(not_found)
        .layer(middleware::from_fn(access_log))
        .with_state(AppState { orchestrator })
}

/// Serve on an already-bound listener until the future is dropped or
/// `shutdown` resolves.
///
/// # Errors
///
/// Returns the underlying I/O error if the accept loop fails.
pub async fn serve(
    listener: TcpListener,
    orchestrator: Arc<WorkflowOrchestrator>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `addr` and log where we are listening.
///
/// # Errors
///
/// Fails if the address cannot be bound.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener
        .local_addr()
        .context("Failed to read bound address")?;
    tracing::info!(addr = %local, "rolecraft listening");
    Ok(listener)
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "healthy" })
}

async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<SuccessBody>, ApiError> {
    let Json(request) = payload?;
    let outcome = state
        .orchestrator
        .run(&request.role, &request.jira_id, &request.conf_id)
        .await
        .map_err(ApiError)?;
    Ok(Json(SuccessBody {
        success: true,
        data: outcome.into(),
    }))
}

async fn not_found() -> (StatusCode, Json<NotFoundBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            success: false,
            message: "Resource not found",
        }),
    )
}

async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    log_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        started.elapsed().as_millis(),
    );
    response
}

//! HTTP API for blogsmith.
//!
//! A thin axum layer over [`BlogWorkflow`]. Form posts redirect back to the
//! blog listing with a status message, matching a classic form-driven UI;
//! listing endpoints return JSON for whatever front end renders them.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::storage::Tone;
use crate::workflow::{parse_tone, BlogWorkflow, WorkflowError, HOME_RECENT_LIMIT};

/// Workflow handle shared by all handlers.
pub type SharedWorkflow = Arc<BlogWorkflow>;

/// Builds the application router.
pub fn router(workflow: SharedWorkflow) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate_blogs))
        .route("/blogs", get(list_blogs))
        .route("/blogs/:id/regenerate", post(regenerate_blog))
        .route("/blogs/:id/download", get(download_blog))
        .layer(CorsLayer::permissive())
        .with_state(workflow)
}

/// Serves the API on `addr` until `shutdown` resolves.
pub async fn serve<F>(workflow: SharedWorkflow, addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(workflow))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

#[derive(Debug, Deserialize)]
struct GenerateForm {
    #[serde(default)]
    titles: String,
    tone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    message: Option<String>,
}

fn tone_names() -> Vec<&'static str> {
    Tone::ALL.iter().map(Tone::as_str).collect()
}

/// Home view data: the tone options and the most recent blogs.
async fn index(State(workflow): State<SharedWorkflow>) -> Response {
    home_response(&workflow, StatusCode::OK, Vec::new())
}

fn home_response(workflow: &BlogWorkflow, status: StatusCode, warnings: Vec<String>) -> Response {
    let recent = match workflow.list_recent(HOME_RECENT_LIMIT) {
        Ok(recent) => recent,
        Err(err) => return error_response(&err),
    };

    let body = serde_json::json!({
        "tones": tone_names(),
        "recent_blogs": recent,
        "warnings": warnings,
        "message": null,
    });
    (status, Json(body)).into_response()
}

async fn generate_blogs(
    State(workflow): State<SharedWorkflow>,
    Form(form): Form<GenerateForm>,
) -> Response {
    let result = match parse_tone(form.tone.as_deref()) {
        Ok(tone) => workflow.generate_batch(&form.titles, tone).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(report) => redirect_to_blogs(&report.message()),
        Err(err) => {
            tracing::warn!("Batch generation failed: {err}");
            home_response(&workflow, status_for(&err), err.user_warnings())
        }
    }
}

async fn list_blogs(
    State(workflow): State<SharedWorkflow>,
    Query(query): Query<ListQuery>,
) -> Response {
    match workflow.list_all() {
        Ok(blogs) => Json(serde_json::json!({
            "blogs": blogs,
            "message": query.message,
        }))
        .into_response(),
        Err(err) => error_response(&err),
    }
}

async fn regenerate_blog(State(workflow): State<SharedWorkflow>, Path(id): Path<i64>) -> Response {
    match workflow.regenerate(id).await {
        Ok(blog) => redirect_to_blogs(&format!("Regenerated '{}' successfully.", blog.title)),
        Err(WorkflowError::Configuration { message, .. }) => redirect_to_blogs(&message),
        Err(WorkflowError::Generation { source, .. }) => {
            redirect_to_blogs(&format!("Failed to regenerate blog: {source}"))
        }
        Err(err) => error_response(&err),
    }
}

async fn download_blog(State(workflow): State<SharedWorkflow>, Path(id): Path<i64>) -> Response {
    let download = match workflow.download(id) {
        Ok(download) => download,
        Err(err) => return error_response(&err),
    };

    let disposition = download.content_disposition();
    let stream = futures::stream::iter(download.lines.into_iter().map(Ok::<_, Infallible>));

    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}

fn redirect_to_blogs(message: &str) -> Response {
    let target = match serde_urlencoded::to_string([("message", message)]) {
        Ok(query) => format!("/blogs?{query}"),
        Err(_) => "/blogs".to_string(),
    };
    Redirect::to(&target).into_response()
}

fn status_for(err: &WorkflowError) -> StatusCode {
    match err {
        WorkflowError::Validation { .. } => StatusCode::BAD_REQUEST,
        WorkflowError::Configuration { .. } => StatusCode::SERVICE_UNAVAILABLE,
        WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkflowError::Generation { .. } | WorkflowError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &WorkflowError) -> Response {
    if let WorkflowError::Storage(e) = err {
        tracing::error!("Storage failure: {e:#}");
    }
    let body = serde_json::json!({
        "detail": err.to_string(),
        "warnings": err.user_warnings(),
    });
    (status_for(err), Json(body)).into_response()
}

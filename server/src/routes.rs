//! Axum HTTP routes for the worker service.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use filemod_worker::{LifecycleState, WorkerService};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::ApiError;

/// Service shared by every handler.
pub type SharedService = Arc<WorkerService>;

// ─── Route builder ───────────────────────────────────────────────

pub fn build_router(service: SharedService) -> Router {
    Router::new()
        .route("/file-stats", get(file_stats))
        .route("/enqueue-commands", post(enqueue_commands))
        .route("/health", get(health))
        .route("/logs", get(file_changes))
        .route("/service/start", post(start_service))
        .route("/service/stop", post(stop_service))
        .route("/service/status", get(service_status))
        .with_state(service)
}

/// Serve the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, service: SharedService, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

// ─── Handlers ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FileStatsQuery {
    directory: Option<String>,
}

async fn file_stats(
    State(service): State<SharedService>,
    Query(query): Query<FileStatsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let directory = query
        .directory
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::BadRequest("directory parameter is required".to_string()))?;

    let records = service.file_stats(&directory).await.inspect_err(|e| {
        error!(directory = %directory, error = %e, "failed to get file stats");
    })?;

    Ok(Json(records))
}

async fn enqueue_commands(
    State(service): State<SharedService>,
    Json(commands): Json<Vec<String>>,
) -> Result<impl IntoResponse, ApiError> {
    service.enqueue_commands(commands).inspect_err(|e| {
        error!(command = %e.command(), error = %e, "failed to enqueue commands");
    })?;

    Ok(StatusCode::ACCEPTED)
}

async fn health() -> impl IntoResponse {
    "OK"
}

async fn file_changes(State(service): State<SharedService>) -> impl IntoResponse {
    Json(service.file_changes().await.to_vec())
}

/// Body returned by the start and stop routes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LifecycleResponse {
    /// State after the request.
    pub state: LifecycleState,

    /// Whether the request changed the state.
    pub changed: bool,
}

async fn start_service(State(service): State<SharedService>) -> impl IntoResponse {
    let changed = service.start().await;
    if changed {
        info!("workers started via http");
    }

    Json(LifecycleResponse {
        state: service.state().await,
        changed,
    })
}

async fn stop_service(State(service): State<SharedService>) -> impl IntoResponse {
    let changed = service.stop().await;
    if changed {
        info!("workers stopped via http");
    }

    Json(LifecycleResponse {
        state: service.state().await,
        changed,
    })
}

async fn service_status(State(service): State<SharedService>) -> impl IntoResponse {
    Json(service.status().await)
}

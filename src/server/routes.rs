use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, error};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::core::process_detail::{ProcessDetail, ProcessDetailProvider};
use crate::core::telemetry::{HostInfo, TelemetryProvider};
use crate::core::topology::{TopologyAssembler, TopologySnapshot};
use crate::error::SysmapError;

/// Shared, read-only handler state. Holds no graph data between requests.
#[derive(Clone)]
pub struct AppState {
    telemetry: Arc<dyn TelemetryProvider>,
    probe_timeout: Duration,
}

impl AppState {
    pub fn new(telemetry: Arc<dyn TelemetryProvider>, probe_timeout: Duration) -> Self {
        Self {
            telemetry,
            probe_timeout,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub host: String,
    pub os: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

enum ApiError {
    NotFound(String),
    Internal(String),
}

impl From<SysmapError> for ApiError {
    fn from(err: SysmapError) -> Self {
        match err {
            SysmapError::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("worker task failed: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/topology", get(topology))
        .route("/api/process/{pid}", get(process_detail))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let host = tokio::task::spawn_blocking(move || state.telemetry.host()).await?;

    // Liveness only; host info is best effort
    let host = host.unwrap_or_else(|e| {
        debug!("Health check could not read host info: {}", e);
        HostInfo::unknown()
    });
    Ok(Json(HealthResponse {
        ok: true,
        host: host.hostname,
        os: host.os,
    }))
}

async fn topology(State(state): State<AppState>) -> Result<Json<TopologySnapshot>, ApiError> {
    let snapshot = tokio::task::spawn_blocking(move || {
        TopologyAssembler::with_timeout(state.telemetry, state.probe_timeout).assemble()
    })
    .await?;

    debug!(
        "Served topology with {} nodes, {} edges",
        snapshot.nodes().len(),
        snapshot.edges().len()
    );
    Ok(Json(snapshot))
}

async fn process_detail(
    State(state): State<AppState>,
    Path(pid): Path<u32>,
) -> Result<Json<ProcessDetail>, ApiError> {
    let detail = tokio::task::spawn_blocking(move || {
        ProcessDetailProvider::new(state.telemetry).lookup(pid)
    })
    .await??;

    Ok(Json(detail))
}

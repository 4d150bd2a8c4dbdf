use crate::error::ServerResult;
use crate::state::{ServerMetadata, ServerState};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "lostfound-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
/// Returns 200 once the store answers queries
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let counts = state.store.counts()?;

    Ok(Json(json!({
        "status": "ready",
        "service": "lostfound-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "store": "ready",
            "matcher": "ready",
        },
        "approved_items": counts.approved,
    })))
}

/// Metrics endpoint: Prometheus text when the exporter is installed,
/// JSON store counters otherwise.
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<Response> {
    if let Some(handle) = state.metrics_handle.as_ref() {
        return Ok((
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response());
    }

    let counts = state.store.counts()?;
    Ok(Json(json!({
        "uptime_seconds": uptime_seconds(),
        "items": counts,
        "admin_sessions": state.sessions.len(),
    }))
    .into_response())
}

/// Server metadata endpoint (admin)
pub async fn server_metadata() -> ServerResult<impl IntoResponse> {
    let metadata = ServerMetadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime_seconds(),
    };

    Ok(Json(serde_json::to_value(metadata)?))
}

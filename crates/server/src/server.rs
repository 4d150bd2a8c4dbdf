//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (admin sessions, logging, compression, etc.)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{admin_auth, log_requests, request_id};
use crate::routes::{admin, claims, health, items, notify, smart_match};
use crate::routes::{api_info, not_found};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Routes are divided into:
/// - Public routes: health probes, browsing, reporting, claims and Smart Match
/// - Admin routes: `/admin/*` except login (live session required)
///
/// Middleware stack (applied in reverse order):
/// 1. Request ID tracking
/// 2. Request logging
/// 3. Timeout handling
/// 4. Compression
/// 5. CORS
/// 6. Admin session check (admin routes only)
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        // Browsing
        .route("/api/overview", get(items::overview))
        .route("/api/items", get(items::list_items).post(items::report_found_item))
        .route("/api/items/{item_id}", get(items::get_item))
        .route("/api/categories", get(items::categories))
        .route("/api/search", get(items::search))
        // Claims and alerts
        .route("/api/items/{item_id}/claim", post(claims::submit_claim))
        .route("/api/notify", post(notify::subscribe))
        // Smart Match
        .route("/api/smart-match", post(smart_match::smart_match))
        .route("/lost", post(smart_match::submit_lost_report))
        // Session
        .route("/admin/login", post(admin::login));

    let admin_routes = Router::new()
        .route("/admin/logout", post(admin::logout))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/action", post(admin::action))
        .route("/admin/items/{item_id}/events", get(admin::item_events))
        .route("/admin/metadata", get(health::server_metadata))
        .layer(from_fn_with_state(state.clone(), admin_auth));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the lost & found HTTP server
///
/// Initializes logging and metrics, opens the store described by
/// `config.pipeline_config` and serves until SIGTERM or Ctrl+C.
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    let mut state = ServerState::new(config.clone())?;
    if config.metrics_enabled {
        match crate::telemetry::install_prometheus() {
            Ok(handle) => state = state.with_metrics_handle(handle),
            Err(err) => tracing::warn!(error = %err, "Prometheus exporter unavailable"),
        }
    }
    let counts = state.store.counts()?;

    let app = build_router(Arc::new(state));
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting lost & found server on {} ({} approved, {} pending items)",
        addr,
        counts.approved,
        counts.pending
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}MB, Admin session TTL: {}s",
        config.timeout_secs,
        config.max_body_size_mb,
        config.admin_session_ttl_secs
    );
    tracing::info!(
        "CORS: {}, Metrics: {}",
        config.enable_cors,
        config.metrics_enabled
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}

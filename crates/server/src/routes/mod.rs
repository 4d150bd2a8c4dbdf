//! API route handlers
//!
//! Routes are organized by functionality:
//!
//! - `health`: Health checks, readiness, and metrics
//! - `items`: Browsing, searching and reporting found items
//! - `claims`: Ownership claims against published items
//! - `notify`: Keyword alert sign-ups
//! - `smart_match`: Lost-item reports ranked by the Smart Match engine
//! - `admin`: Session login and the moderation dashboard

pub mod admin;
pub mod claims;
pub mod health;
pub mod items;
pub mod notify;
pub mod smart_match;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Returns server information including version and available endpoints.
/// This is the root endpoint (GET /) and requires no authentication.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Lost & Found Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/overview",
            "/api/items",
            "/api/categories",
            "/api/search",
            "/api/notify",
            "/api/smart-match",
            "/lost",
            "/admin/login",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

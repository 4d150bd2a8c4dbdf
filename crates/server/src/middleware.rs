use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use headers::authorization::Bearer;
use headers::{Authorization, Cookie, HeaderMapExt};
use std::sync::Arc;

/// Name of the cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "lf_admin";

/// Session token of the authenticated admin, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AdminSession(pub String);

/// Session token from the `lf_admin` cookie or an `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(SESSION_COOKIE).map(str::to_string))
        .or_else(|| {
            headers
                .typed_get::<Authorization<Bearer>>()
                .map(|auth| auth.token().to_string())
        })
}

/// Admin session authentication middleware
pub async fn admin_auth(
    state: axum::extract::State<Arc<ServerState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    match session_token(request.headers()) {
        Some(token) if state.is_valid_session(&token) => {
            request.extensions_mut().insert(AdminSession(token));
            Ok(next.run(request).await)
        }
        Some(_) => Err(ServerError::Authentication(
            "Admin session expired or invalid. Log in again".to_string(),
        )),
        None => Err(ServerError::Authentication(
            "Admin session required. Log in via POST /admin/login".to_string(),
        )),
    }
}

/// Request ID injection middleware
pub async fn request_id(mut request: Request, next: Next) -> Response {
    // Generate or extract request ID
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = request_id.parse::<HeaderValue>() {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}

/// Request ID, stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Logging middleware
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    tracing::info!(
        method = %method,
        uri = %uri,
        request_id = %request_id,
        "Request started"
    );

    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    metrics::counter!(
        crate::telemetry::HTTP_REQUESTS,
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

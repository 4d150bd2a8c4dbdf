use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] lostfound::PipelineError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Match error: {0}")]
    Match(#[from] matcher::MatchError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Store(err) => match err {
                store::StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                store::StoreError::Validation(_) => StatusCode::BAD_REQUEST,
                store::StoreError::InvalidState(_) => StatusCode::CONFLICT,
                store::StoreError::Backend(_) | store::StoreError::Serialization(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ServerError::Pipeline(err) => match err {
                lostfound::PipelineError::InvalidReport(_) => StatusCode::BAD_REQUEST,
                lostfound::PipelineError::Store(_)
                | lostfound::PipelineError::Match(_)
                | lostfound::PipelineError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Match(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Authentication(_) => "AUTH_FAILED",
            ServerError::Timeout => "REQUEST_TIMEOUT",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Pipeline(lostfound::PipelineError::InvalidReport(_)) => "INVALID_REPORT",
            ServerError::Pipeline(_) => "PIPELINE_ERROR",
            ServerError::Store(store::StoreError::NotFound { .. }) => "NOT_FOUND",
            ServerError::Store(store::StoreError::Validation(_)) => "VALIDATION_FAILED",
            ServerError::Store(store::StoreError::InvalidState(_)) => "INVALID_STATE",
            ServerError::Store(_) => "STORE_ERROR",
            ServerError::Match(_) => "MATCH_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("JSON parse error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

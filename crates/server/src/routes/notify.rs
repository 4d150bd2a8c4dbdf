use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Keyword alert sign-up
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub keyword: String,
}

pub async fn subscribe(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<NotifyRequest>,
) -> ServerResult<impl IntoResponse> {
    let notification = state
        .store
        .add_notification(&request.email, &request.keyword)?;
    let message = format!(
        "We'll email {} when a '{}' item is posted!",
        notification.email, notification.keyword
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "notification": notification,
            "message": message,
        })),
    ))
}

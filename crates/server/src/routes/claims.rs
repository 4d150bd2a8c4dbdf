use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use store::NewClaim;

/// File an ownership claim against an approved item.
pub async fn submit_claim(
    State(state): State<Arc<ServerState>>,
    Path(item_id): Path<u64>,
    Json(new_claim): Json<NewClaim>,
) -> ServerResult<impl IntoResponse> {
    let claim = state.store.submit_claim(item_id, new_claim)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "claim": claim,
            "message": "Claim submitted! We'll contact you via email soon.",
        })),
    ))
}

//! Admin session handling and moderation actions.

use crate::catalog::item_views;
use crate::error::{ServerError, ServerResult};
use crate::middleware::{AdminSession, SESSION_COOKIE};
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use store::{ClaimStatus, ItemFilter, ItemStatus};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Moderation actions available on the dashboard.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    ApproveItem,
    RejectItem,
    MarkClaimed,
    ApproveClaim,
    RejectClaim,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: AdminAction,
    #[serde(default)]
    pub item_id: Option<u64>,
    #[serde(default)]
    pub claim_id: Option<u64>,
}

fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

pub async fn login(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<LoginRequest>,
) -> ServerResult<impl IntoResponse> {
    if !state.verify_admin_password(&request.password) {
        tracing::warn!("rejected admin login");
        return Err(ServerError::Authentication("Incorrect password.".to_string()));
    }

    let token = state.create_session();
    let ttl = state.config.admin_session_ttl_secs;
    tracing::info!("admin session started");

    Ok((
        [(SET_COOKIE, session_cookie(&token, ttl))],
        Json(json!({
            "token": token,
            "expires_in_secs": ttl,
        })),
    ))
}

pub async fn logout(
    State(state): State<Arc<ServerState>>,
    Extension(AdminSession(token)): Extension<AdminSession>,
) -> impl IntoResponse {
    state.end_session(&token);
    (
        [(SET_COOKIE, session_cookie("", 0))],
        Json(json!({ "message": "Logged out." })),
    )
}

/// Everything the moderation dashboard shows, newest first.
pub async fn dashboard(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let store = &state.store;
    let pending_items = store.list_items(&ItemFilter::with_status(ItemStatus::Pending))?;
    let approved_items = store.list_items(&ItemFilter::approved())?;
    let claimed_items = store.list_items(&ItemFilter::with_status(ItemStatus::Claimed))?;

    Ok(Json(json!({
        "counts": store.counts()?,
        "pending_items": item_views(pending_items),
        "approved_items": item_views(approved_items),
        "claimed_items": item_views(claimed_items),
        "pending_claims": store.list_claims(Some(ClaimStatus::Pending))?,
        "notifications": store.list_notifications()?,
        "lost_reports": store.list_lost_reports()?,
    })))
}

fn require_id(id: Option<u64>, field: &str) -> ServerResult<u64> {
    id.ok_or_else(|| ServerError::BadRequest(format!("{field} is required for this action")))
}

pub async fn action(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ActionRequest>,
) -> ServerResult<impl IntoResponse> {
    let store = &state.store;
    let message = match request.action {
        AdminAction::ApproveItem => {
            store.approve_item(require_id(request.item_id, "item_id")?)?;
            "Item approved and published."
        }
        AdminAction::RejectItem => {
            store.reject_item(require_id(request.item_id, "item_id")?)?;
            "Item rejected and removed."
        }
        AdminAction::MarkClaimed => {
            store.mark_claimed(require_id(request.item_id, "item_id")?)?;
            "Item marked as claimed."
        }
        AdminAction::ApproveClaim => {
            store.approve_claim(require_id(request.claim_id, "claim_id")?)?;
            "Claim approved. Item marked as claimed."
        }
        AdminAction::RejectClaim => {
            store.reject_claim(require_id(request.claim_id, "claim_id")?)?;
            "Claim rejected."
        }
    };
    tracing::info!(action = ?request.action, item_id = ?request.item_id, claim_id = ?request.claim_id, "admin action applied");

    Ok(Json(json!({ "ok": true, "message": message })))
}

/// Audit trail of one item, oldest first.
pub async fn item_events(
    State(state): State<Arc<ServerState>>,
    Path(item_id): Path<u64>,
) -> ServerResult<impl IntoResponse> {
    let events = state.store.events_for_item(item_id)?;
    if events.is_empty() {
        return Err(ServerError::NotFound);
    }
    Ok(Json(json!({
        "item_id": item_id,
        "events": events,
    })))
}

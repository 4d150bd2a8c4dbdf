use crate::catalog::MatchView;
use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Form, Json};
use lostfound::{find_matches, report_lost_item, LostReportInput, MatchResult};
use serde_json::json;
use std::sync::Arc;

/// Attach display fields, taking each hit's photo from its stored record.
fn enrich(state: &ServerState, results: Vec<MatchResult>) -> ServerResult<Vec<MatchView>> {
    results
        .into_iter()
        .map(|result| -> ServerResult<MatchView> {
            let stored = state.store.get_item(result.item.id)?;
            let photo = stored.as_ref().and_then(|item| item.photo_url.as_deref());
            Ok(MatchView::new(result, photo))
        })
        .collect()
}

/// Rank approved items against a lost-item description.
///
/// Accepts `date_from`/`date_to`, or the older single `date_lost`. Nothing is
/// stored; incomplete descriptions simply score lower.
pub async fn smart_match(
    State(state): State<Arc<ServerState>>,
    Json(input): Json<LostReportInput>,
) -> ServerResult<Json<Vec<MatchView>>> {
    let results = find_matches(&state.store, &state.matcher, &input.to_query())?;
    Ok(Json(enrich(&state, results)?))
}

/// Form submission flow: store the lost-item report, then rank.
pub async fn submit_lost_report(
    State(state): State<Arc<ServerState>>,
    Form(input): Form<LostReportInput>,
) -> ServerResult<impl IntoResponse> {
    let (report, results) = report_lost_item(&state.store, &state.matcher, input)?;
    let matches = enrich(&state, results)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "report_id": report.id,
            "report": report,
            "matches": matches,
        })),
    ))
}

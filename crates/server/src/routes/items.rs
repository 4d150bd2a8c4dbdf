use crate::catalog::{item_views, ItemView, CATEGORY_EMOJI};
use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use store::{ItemFilter, NewItem};

/// Items shown on the landing overview.
const RECENT_ITEMS: usize = 6;

/// Maximum rows returned by the quick-search endpoint.
const SEARCH_LIMIT: usize = 10;

/// Item listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    /// Free-text search over name, description and location
    #[serde(default)]
    pub q: Option<String>,

    /// Exact category filter
    #[serde(default)]
    pub category: Option<String>,
}

/// One quick-search row
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRow {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub location: String,
    pub date_found: String,
}

/// Landing overview: newest approved items plus totals.
pub async fn overview(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let recent = state.store.list_items(&ItemFilter {
        limit: Some(RECENT_ITEMS),
        ..ItemFilter::approved()
    })?;
    let counts = state.store.counts()?;

    Ok(Json(json!({
        "recent": item_views(recent),
        "total": counts.approved,
        "claimed": counts.claimed,
    })))
}

/// Browse approved items, newest first.
pub async fn list_items(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListItemsQuery>,
) -> ServerResult<impl IntoResponse> {
    let items = state.store.list_items(&ItemFilter {
        search: query.q.clone(),
        category: query.category.clone(),
        ..ItemFilter::approved()
    })?;
    let categories = state.store.approved_categories()?;

    Ok(Json(json!({
        "total": items.len(),
        "items": item_views(items),
        "search": query.q.unwrap_or_default(),
        "category": query.category.unwrap_or_default(),
        "categories": categories,
    })))
}

/// Detail view of one approved item, with its variants.
pub async fn get_item(
    State(state): State<Arc<ServerState>>,
    Path(item_id): Path<u64>,
) -> ServerResult<Json<ItemView>> {
    let item = state.store.get_approved_item(item_id)?;
    let variants = state.store.variants_for_item(item_id)?;
    Ok(Json(ItemView::new(item).with_variants(variants)))
}

/// Report a found item. It stays hidden until an admin approves it.
pub async fn report_found_item(
    State(state): State<Arc<ServerState>>,
    Json(new_item): Json<NewItem>,
) -> ServerResult<impl IntoResponse> {
    let item = state.store.submit_item(new_item)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "item": ItemView::new(item),
            "message": "Item reported! It will appear once reviewed by an admin.",
        })),
    ))
}

/// Categories in use by approved items, plus every selectable category.
pub async fn categories(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let in_use = state.store.approved_categories()?;
    let known: Vec<&str> = CATEGORY_EMOJI.iter().map(|(name, _)| *name).collect();

    Ok(Json(json!({
        "categories": in_use,
        "known": known,
    })))
}

/// Quick search: at most ten approved rows.
pub async fn search(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListItemsQuery>,
) -> ServerResult<Json<Vec<SearchRow>>> {
    let rows = state
        .store
        .list_items(&ItemFilter {
            search: query.q,
            limit: Some(SEARCH_LIMIT),
            ..ItemFilter::approved()
        })?
        .into_iter()
        .map(|item| SearchRow {
            id: item.id,
            name: item.name,
            category: item.category,
            location: item.location,
            date_found: item.date_found,
        })
        .collect();

    Ok(Json(rows))
}

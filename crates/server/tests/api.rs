//! Integration tests for the HTTP API
//!
//! Each test drives the full router (middleware included) with
//! `tower::ServiceExt::oneshot` against a freshly seeded in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use matcher::SmartMatcher;
use serde_json::{json, Value};
use server::{build_router, ServerConfig, ServerState};
use store::ItemStore;
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "test-pass";

fn create_test_state(session_ttl_secs: u64) -> Arc<ServerState> {
    let store = ItemStore::in_memory();
    store.seed_sample_data().expect("seed sample data");
    let config = ServerConfig {
        admin_password: ADMIN_PASSWORD.to_string(),
        admin_session_ttl_secs: session_ttl_secs,
        ..ServerConfig::default()
    };
    Arc::new(ServerState::with_components(
        config,
        store,
        SmartMatcher::default(),
    ))
}

fn test_app() -> Router {
    build_router(create_test_state(3600))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("response body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_session(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        COOKIE,
        format!("lf_admin={token}").parse().unwrap(),
    );
    request
}

async fn login(app: &Router) -> String {
    let (status, headers, body) = send(
        app,
        post_json("/admin/login", json!({ "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cookie = headers
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let token = body["token"].as_str().expect("token").to_string();
    assert!(cookie.starts_with(&format!("lf_admin={token}")));
    assert!(cookie.contains("HttpOnly"));
    token
}

#[tokio::test]
async fn test_health_and_info() {
    let app = test_app();

    let (status, headers, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(headers.contains_key("x-request-id"));

    let (status, _, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approved_items"], 12);

    let (status, _, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Lost & Found Server");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = test_app();
    let request = Request::get("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(&app, request).await;
    assert_eq!(headers.get("x-request-id").unwrap(), "req-42");
}

#[tokio::test]
async fn test_unknown_route_returns_error_body() {
    let app = test_app();
    let (status, _, body) = send(&app, get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_metrics_without_exporter_reports_counts() {
    let app = test_app();
    let (status, _, body) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"]["approved"], 12);
}

#[tokio::test]
async fn test_overview_lists_six_newest() {
    let app = test_app();
    let (status, _, body) = send(&app, get("/api/overview")).await;
    assert_eq!(status, StatusCode::OK);

    let recent = body["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 6);
    assert_eq!(recent[0]["name"], "Purple Spiral Notebook");
    assert_eq!(recent[0]["emoji"], "📚");
    assert_eq!(body["total"], 12);
    assert_eq!(body["claimed"], 0);
}

#[tokio::test]
async fn test_list_items_filters_by_category_and_search() {
    let app = test_app();

    let (_, _, body) = send(&app, get("/api/items?category=Electronics")).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["categories"].as_array().unwrap().len(), 8);
    assert!(body["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["category"] == "Electronics"));

    let (_, _, body) = send(&app, get("/api/items?q=hydro")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "Green Hydro Flask (32oz)");
}

#[tokio::test]
async fn test_item_detail_includes_variants() {
    let app = test_app();

    let (status, _, body) = send(&app, get("/api/items/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Apple AirPods");
    assert_eq!(body["emoji"], "📱");
    assert_eq!(body["variants"].as_array().unwrap().len(), 5);

    let (status, _, body) = send(&app, get("/api/items/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_quick_search_is_limited() {
    let app = test_app();

    let (_, _, body) = send(&app, get("/api/search?q=library")).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 11);
    assert_eq!(
        rows[0].as_object().unwrap().keys().len(),
        5,
        "rows carry id, name, category, location, date_found"
    );

    let (_, _, body) = send(&app, get("/api/search")).await;
    assert_eq!(body.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_categories() {
    let app = test_app();
    let (_, _, body) = send(&app, get("/api/categories")).await;
    assert_eq!(body["categories"].as_array().unwrap().len(), 8);
    assert_eq!(body["known"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_smart_match_accepts_legacy_date() {
    let app = test_app();
    let request = post_json(
        "/api/smart-match",
        json!({
            "name": "Hydro Flask",
            "category": "Water Bottles",
            "description": "green bottle with stickers",
            "location": "Library",
            "date_lost": "2026-02-10"
        }),
    );

    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let matches = body.as_array().unwrap();
    assert!(!matches.is_empty() && matches.len() <= 5);
    let top = &matches[0];
    assert_eq!(top["item"]["name"], "Green Hydro Flask (32oz)");
    assert_eq!(top["score"], 97);
    assert_eq!(top["confidence"], "High");
    assert_eq!(top["emoji"], "💧");
    assert!(top["photo_url"].as_str().unwrap().starts_with("https://"));
    assert_eq!(top["reasons"][0], "Same category");
}

#[tokio::test]
async fn test_smart_match_does_not_store_reports() {
    let state = create_test_state(3600);
    let app = build_router(state.clone());
    let request = post_json(
        "/api/smart-match",
        json!({ "name": "Keys", "category": "Keys", "date_from": "2026-02-09" }),
    );
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.store.list_lost_reports().unwrap().is_empty());
}

#[tokio::test]
async fn test_lost_form_stores_report_and_ranks() {
    let state = create_test_state(3600);
    let app = build_router(state.clone());
    let form = "name=Hydro+Flask&category=Water+Bottles&description=green+bottle+with+stickers\
                &location=Library&date_from=2026-02-10&date_to=2026-02-10&contact=";
    let request = Request::post("/lost")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["report_id"], 1);
    assert_eq!(body["report"]["contact"], Value::Null);
    assert_eq!(body["matches"][0]["score"], 97);
    assert_eq!(state.store.list_lost_reports().unwrap().len(), 1);
}

#[tokio::test]
async fn test_lost_form_requires_name_and_category() {
    let app = test_app();
    let request = Request::post("/lost")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("description=blue"))
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REPORT");
}

#[tokio::test]
async fn test_notify_signup() {
    let app = test_app();
    let (status, _, body) = send(
        &app,
        post_json(
            "/api/notify",
            json!({ "email": "sam@example.edu", "keyword": "airpods" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["message"],
        "We'll email sam@example.edu when a 'airpods' item is posted!"
    );

    let (status, _, body) = send(
        &app,
        post_json("/api/notify", json!({ "email": "sam@example.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let app = test_app();

    let (status, _, body) = send(&app, get("/admin/dashboard")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_FAILED");

    let (status, _, _) = send(&app, with_session(get("/admin/dashboard"), "forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(
        &app,
        post_json("/admin/login", json!({ "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let app = build_router(create_test_state(0));
    let token = login(&app).await;

    let (status, _, _) = send(&app, with_session(get("/admin/dashboard"), &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_and_logout() {
    let app = test_app();
    let token = login(&app).await;

    let request = Request::get("/admin/dashboard")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"]["approved"], 12);

    let logout = with_session(Request::post("/admin/logout").body(Body::empty()).unwrap(), &token);
    let (status, _, _) = send(&app, logout).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&app, with_session(get("/admin/dashboard"), &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_found_item_moderation_flow() {
    let app = test_app();
    let token = login(&app).await;

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/items",
            json!({
                "name": "Red Umbrella",
                "category": "Other",
                "description": "Compact red umbrella",
                "location": "Front Office",
                "date_found": "2026-02-17"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = body["item"]["id"].as_u64().unwrap();
    assert_eq!(body["item"]["status"], "pending");
    assert_eq!(body["item"]["emoji"], "📦");

    let (status, _, _) = send(&app, get(&format!("/api/items/{item_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, _, body) = send(&app, with_session(get("/admin/dashboard"), &token)).await;
    assert_eq!(body["pending_items"].as_array().unwrap().len(), 1);

    let approve = post_json(
        "/admin/action",
        json!({ "action": "approve_item", "item_id": item_id }),
    );
    let (status, _, body) = send(&app, with_session(approve, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item approved and published.");

    let (status, _, body) = send(&app, get(&format!("/api/items/{item_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["photo_url"].as_str().is_some());

    let (_, _, body) = send(
        &app,
        with_session(get(&format!("/admin/items/{item_id}/events")), &token),
    )
    .await;
    let kinds: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["kind"].as_str())
        .collect();
    assert_eq!(kinds, vec!["submitted", "approved"]);

    let reject = post_json(
        "/admin/action",
        json!({ "action": "reject_item", "item_id": item_id }),
    );
    let (status, _, _) = send(&app, with_session(reject, &token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&app, get(&format!("/api/items/{item_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_claim_approval_marks_item_claimed() {
    let app = test_app();
    let token = login(&app).await;

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/items/2/claim",
            json!({
                "claimant": "Jordan Lee",
                "email": "jordan@example.edu",
                "student_id": "S12345",
                "message": "Red keychain is mine"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let claim_id = body["claim"]["id"].as_u64().unwrap();

    let (_, _, body) = send(&app, with_session(get("/admin/dashboard"), &token)).await;
    let pending = body["pending_claims"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["item_name"], "Blue Nike Backpack");

    let approve = post_json(
        "/admin/action",
        json!({ "action": "approve_claim", "claim_id": claim_id }),
    );
    let (status, _, _) = send(&app, with_session(approve, &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&app, get("/api/items/2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, _, body) = send(&app, get("/api/overview")).await;
    assert_eq!(body["claimed"], 1);

    let again = post_json(
        "/admin/action",
        json!({ "action": "approve_claim", "claim_id": claim_id }),
    );
    let (status, _, body) = send(&app, with_session(again, &token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_admin_action_requires_target_id() {
    let app = test_app();
    let token = login(&app).await;
    let request = post_json("/admin/action", json!({ "action": "mark_claimed" }));
    let (status, _, body) = send(&app, with_session(request, &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_claims_on_unknown_items_fail() {
    let app = test_app();
    let (status, _, _) = send(
        &app,
        post_json(
            "/api/items/404/claim",
            json!({ "claimant": "A", "email": "a@b.c", "student_id": "1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

mod common;

use axum::Router;
use axum::http::StatusCode;
use axum_test::TestServer;
use link_firewall::api::routes::link_monitor_routes;
use link_firewall::domain::LinkEvent;
use link_firewall::state::AppState;
use serde_json::json;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .nest("/link-monitor", link_monitor_routes())
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_history_empty() {
    let server = server(common::create_test_state());

    let response = server.get("/link-monitor/history").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 0);
    assert_eq!(json["capacity"], 200);
    assert_eq!(json["items"], json!([]));
}

#[tokio::test]
async fn test_history_lists_blocked_links() {
    let state = common::create_test_state();
    let mut blocked = LinkEvent::new(common::RICKROLL_URL, "test");
    let mut safe = LinkEvent::new(common::SAFE_URL, "test");
    state.firewall.inspect(&mut blocked);
    state.firewall.inspect(&mut safe);
    let server = server(state);

    let response = server.get("/link-monitor/history").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["url"], common::RICKROLL_URL);
    assert_eq!(
        json["items"][0]["reason"],
        "Matched known Rickroll pattern: dQw4w9WgXcQ"
    );
    assert!(json["items"][0]["when"].is_string());
}

#[tokio::test]
async fn test_check_matching_url() {
    let state = common::create_test_state();
    let server = server(state.clone());

    let response = server
        .post("/link-monitor/check")
        .json(&json!({ "url": common::RICKROLL_URL }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["is_match"], true);
    assert_eq!(json["matched_pattern"], "dQw4w9WgXcQ");
    assert_eq!(json["confidence"], 1.0);

    // Checking never blocks or records.
    assert!(state.firewall.history().is_empty());
}

#[tokio::test]
async fn test_check_safe_url() {
    let server = server(common::create_test_state());

    let response = server
        .post("/link-monitor/check")
        .json(&json!({ "url": common::SAFE_URL }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["is_match"], false);
    assert_eq!(json["confidence"], 0.1);
    assert!(json.get("matched_pattern").is_none());
}

#[tokio::test]
async fn test_check_rejects_invalid_url() {
    let server = server(common::create_test_state());

    let response = server
        .post("/link-monitor/check")
        .json(&json!({ "url": "not a url" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_check_rejects_non_web_scheme() {
    let server = server(common::create_test_state());

    let response = server
        .post("/link-monitor/check")
        .json(&json!({ "url": "file:///etc/passwd" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

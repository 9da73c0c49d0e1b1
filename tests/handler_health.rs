mod common;

use axum::http::StatusCode;
use axum::{Router, routing::get};
use axum_test::TestServer;
use link_firewall::api::handlers::health_handler;
use link_firewall::state::AppState;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let state = common::create_test_state();
    let server = server(state);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["monitor"]["status"], "ok");
    assert_eq!(json["checks"]["firewall"]["status"], "ok");
    assert!(
        json["checks"]["monitor"]["message"]
            .as_str()
            .unwrap()
            .contains("1 subscribers")
    );
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = server(common::create_test_state());

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("checks").is_some());
    assert!(json["checks"].get("monitor").is_some());
    assert!(json["checks"].get("firewall").is_some());
}

#[tokio::test]
async fn test_health_degraded_before_start() {
    let server = server(common::create_idle_state());

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["monitor"]["status"], "error");
}

#[tokio::test]
async fn test_health_degraded_after_shutdown() {
    let state = common::create_test_state();
    state.monitor.shutdown().await;
    let server = server(state);

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["monitor"]["message"], "Stopped");
}

//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`                - Monitor and firewall status
//! - `GET  /link-monitor/history`  - Blocked link history
//! - `POST /link-monitor/check`    - Classify a URL without blocking

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/link-monitor", api::routes::link_monitor_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

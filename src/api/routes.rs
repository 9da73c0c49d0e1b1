//! Link monitor route configuration.

use crate::api::handlers::{check_handler, history_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link monitor routes, mounted under `/link-monitor`.
///
/// # Endpoints
///
/// - `GET  /history` - Blocked link history
/// - `POST /check`   - Classify a URL without blocking
pub fn link_monitor_routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(history_handler))
        .route("/check", post(check_handler))
}

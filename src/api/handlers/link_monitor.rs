//! Handlers for the link monitor endpoints.

use axum::{Json, extract::State};

use crate::api::dto::link_monitor::{CheckRequest, CheckResponse, HistoryItem, HistoryResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::web_url::parse_web_url;

/// Returns the firewall's blocked link history.
///
/// # Endpoint
///
/// `GET /link-monitor/history`
///
/// # Response
///
/// ```json
/// {
///   "total": 1,
///   "capacity": 200,
///   "items": [
///     {
///       "url": "https://youtu.be/dQw4w9WgXcQ",
///       "when": "2024-05-01T11:00:00Z",
///       "reason": "Matched known Rickroll pattern: dQw4w9WgXcQ"
///     }
///   ]
/// }
/// ```
pub async fn history_handler(State(state): State<AppState>) -> Json<HistoryResponse> {
    let items: Vec<HistoryItem> = state
        .firewall
        .history()
        .into_iter()
        .map(HistoryItem::from)
        .collect();

    Json(HistoryResponse {
        total: items.len(),
        capacity: state.firewall.capacity(),
        items,
    })
}

/// Classifies a URL without blocking or recording anything.
///
/// # Endpoint
///
/// `POST /link-monitor/check`
///
/// # Request Body
///
/// ```json
/// { "url": "https://youtu.be/dQw4w9WgXcQ" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is malformed or not HTTP(S).
pub async fn check_handler(
    State(state): State<AppState>,
    Json(payload): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, AppError> {
    let url = parse_web_url(&payload.url)?;
    let result = state.firewall.classify(url.as_str());

    Ok(Json(CheckResponse::new(url.to_string(), result)))
}

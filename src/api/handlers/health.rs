//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::application::services::MonitorState;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Dispatch loop running
/// - **503 Service Unavailable**: Dispatch loop not started or stopped
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "monitor": { "status": "ok", "message": "Running, 2 subscribers, 0 pending" },
///     "firewall": { "status": "ok", "message": "3 of 200 history slots used" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let monitor_check = check_monitor(&state);
    let firewall_check = check_firewall(&state);

    let all_healthy = monitor_check.status == "ok" && firewall_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            monitor: monitor_check,
            firewall: firewall_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks that the dispatch loop is running.
fn check_monitor(state: &AppState) -> CheckStatus {
    let monitor = &state.monitor;
    let detail = format!(
        "{} subscribers, {} pending",
        monitor.subscriber_count(),
        monitor.pending()
    );

    match monitor.state() {
        MonitorState::Started if monitor.is_running() => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Running, {detail}")),
        },
        MonitorState::Created => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Not started, {detail}")),
        },
        _ => CheckStatus {
            status: "error".to_string(),
            message: Some("Stopped".to_string()),
        },
    }
}

/// Reports history usage. The firewall has no failure mode of its own.
fn check_firewall(state: &AppState) -> CheckStatus {
    CheckStatus {
        status: "ok".to_string(),
        message: Some(format!(
            "{} of {} history slots used",
            state.firewall.history().len(),
            state.firewall.capacity()
        )),
    }
}

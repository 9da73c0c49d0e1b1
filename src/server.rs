//! Runtime setup: monitor, firewall, watcher and the optional HTTP server.

use crate::application::services::{FirewallService, LinkMonitor};
use crate::application::{AuditLogHook, OnLinkOpen, SubscribeOptions};
use crate::config::Config;
use crate::domain::BaitDetector;
use crate::infrastructure::watcher::{RecentLinkWatcher, WatcherConfig};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the link firewall until ctrl-c.
///
/// Initializes:
/// - Firewall, subscribed ahead of every other handler
/// - Audit hook for blocked links
/// - Recent links watcher
/// - Axum HTTP server (only when `LISTEN` is set)
///
/// # Errors
///
/// Returns an error if:
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let monitor = LinkMonitor::new();
    let firewall = Arc::new(FirewallService::with_capacity(
        Arc::new(BaitDetector),
        config.history_capacity,
    ));

    monitor.subscribe(firewall.clone(), SubscribeOptions::default());
    OnLinkOpen::register(
        &monitor,
        firewall.clone(),
        AuditLogHook,
        SubscribeOptions::blocked_only(),
    );
    tracing::info!("Firewall subscribed");

    let watcher = Arc::new(RecentLinkWatcher::new(
        WatcherConfig::new(&config.recent_links_file)
            .with_poll_interval(config.poll_interval())
            .with_dedup_window(config.dedup_window),
    ));
    monitor.register_source(watcher.clone());
    monitor.ensure_running();

    let served = match config.listen_addr {
        Some(ref listen) => serve(listen, AppState::new(monitor.clone(), firewall)).await,
        None => {
            tracing::info!("HTTP disabled, press ctrl-c to stop");
            shutdown_signal().await;
            Ok(())
        }
    };

    monitor.shutdown().await;
    watcher.shutdown().await;
    tracing::info!("Link monitor stopped");

    served
}

async fn serve(listen: &str, state: AppState) -> Result<()> {
    let app = app_router(state);

    let addr: SocketAddr = listen.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        return;
    }
    tracing::info!("Shutdown requested");
}

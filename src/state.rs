//! Shared state handed to HTTP handlers.

use std::sync::Arc;

use crate::application::services::{FirewallService, LinkMonitor};

/// Handles to the running monitor and firewall.
///
/// Handlers only read through these; the HTTP layer is a passthrough.
#[derive(Clone)]
pub struct AppState {
    pub monitor: LinkMonitor,
    pub firewall: Arc<FirewallService>,
}

impl AppState {
    pub fn new(monitor: LinkMonitor, firewall: Arc<FirewallService>) -> Self {
        Self { monitor, firewall }
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use link_firewall::application::services::{FirewallService, LinkMonitor};
use link_firewall::application::{LinkEventHandler, SubscribeOptions};
use link_firewall::domain::{BaitDetector, LinkEvent};
use link_firewall::state::AppState;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const RICKROLL_URL: &str = "https://youtu.be/dQw4w9WgXcQ";
pub const SAFE_URL: &str = "https://example.com/docs";

/// Running monitor with the firewall subscribed.
pub fn create_test_state() -> AppState {
    let monitor = LinkMonitor::new();
    let firewall = Arc::new(FirewallService::new(Arc::new(BaitDetector)));
    monitor.subscribe(firewall.clone(), SubscribeOptions::default());
    AppState::new(monitor, firewall)
}

/// Monitor that has never been started.
pub fn create_idle_state() -> AppState {
    let firewall = Arc::new(FirewallService::new(Arc::new(BaitDetector)));
    AppState::new(LinkMonitor::new(), firewall)
}

/// What a handler saw when an event reached it.
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub url: String,
    pub blocked: bool,
    pub blocked_by: Option<String>,
}

/// Handler that records every delivery.
#[derive(Default)]
pub struct Recorder {
    seen: Mutex<Vec<Seen>>,
}

impl Recorder {
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkEventHandler for Recorder {
    async fn handle(&self, event: &mut LinkEvent) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(Seen {
            url: event.url.clone(),
            blocked: event.blocked,
            blocked_by: event.blocked_by.clone(),
        });
        Ok(())
    }
}

/// Handler that always fails.
pub struct Failing;

#[async_trait]
impl LinkEventHandler for Failing {
    async fn handle(&self, _event: &mut LinkEvent) -> anyhow::Result<()> {
        anyhow::bail!("handler exploded")
    }
}

/// Polls `condition` every 20ms for up to two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

mod common;

use async_trait::async_trait;
use common::{Failing, RICKROLL_URL, Recorder, SAFE_URL, Seen};
use link_firewall::application::services::{FirewallService, LinkMonitor};
use link_firewall::application::{LinkOpenHook, OnLinkOpen, SubscribeOptions};
use link_firewall::domain::{BaitDetector, ClassificationResult, LinkEvent};
use link_firewall::infrastructure::watcher::{RecentLinkWatcher, WatcherConfig, WatcherState};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

fn firewall() -> Arc<FirewallService> {
    Arc::new(FirewallService::new(Arc::new(BaitDetector)))
}

#[derive(Clone, Default)]
struct CollectingHook {
    seen: Arc<Mutex<Vec<(String, bool, bool)>>>,
}

#[async_trait]
impl LinkOpenHook for CollectingHook {
    async fn on_link_open(
        &self,
        event: &LinkEvent,
        analysis: &ClassificationResult,
    ) -> anyhow::Result<()> {
        self.seen
            .lock()
            .unwrap()
            .push((event.url.clone(), event.blocked, analysis.is_match));
        Ok(())
    }
}

#[tokio::test]
async fn test_blocked_link_reaches_later_handlers_already_blocked() {
    let monitor = LinkMonitor::new();
    let firewall = firewall();
    let recorder = Arc::new(Recorder::default());
    monitor.subscribe(firewall.clone(), SubscribeOptions::default());
    monitor.subscribe(recorder.clone(), SubscribeOptions::default());

    monitor.publish(LinkEvent::new(RICKROLL_URL, "test"));
    monitor.drain().await;

    assert_eq!(
        recorder.seen(),
        vec![Seen {
            url: RICKROLL_URL.to_string(),
            blocked: true,
            blocked_by: Some("LinkFirewall".to_string()),
        }]
    );
    let history = firewall.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].url, RICKROLL_URL);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_safe_link_stays_unblocked() {
    let monitor = LinkMonitor::new();
    let firewall = firewall();
    let recorder = Arc::new(Recorder::default());
    monitor.subscribe(firewall.clone(), SubscribeOptions::default());
    monitor.subscribe(recorder.clone(), SubscribeOptions::default());

    monitor.publish(LinkEvent::new(SAFE_URL, "test"));
    monitor.drain().await;

    let seen = recorder.seen();
    assert_eq!(seen.len(), 1);
    assert!(!seen[0].blocked);
    assert!(firewall.history().is_empty());
    assert_eq!(firewall.classify(SAFE_URL).confidence, 0.1);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_failing_handler_does_not_stop_delivery() {
    let monitor = LinkMonitor::new();
    let recorder = Arc::new(Recorder::default());
    monitor.subscribe(Arc::new(Failing), SubscribeOptions::default());
    monitor.subscribe(recorder.clone(), SubscribeOptions::default());

    for i in 0..3 {
        monitor.publish(LinkEvent::new(format!("https://example.com/{i}"), "test"));
    }
    monitor.drain().await;

    assert_eq!(recorder.seen().len(), 3);
    assert!(monitor.is_running());

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_blocked_only_hook_sees_only_blocked_links() {
    let monitor = LinkMonitor::new();
    let firewall = firewall();
    let hook = CollectingHook::default();
    monitor.subscribe(firewall.clone(), SubscribeOptions::default());
    OnLinkOpen::register(
        &monitor,
        firewall.clone(),
        hook.clone(),
        SubscribeOptions::blocked_only(),
    );

    monitor.publish(LinkEvent::new(SAFE_URL, "test"));
    monitor.publish(LinkEvent::new(RICKROLL_URL, "test"));
    monitor.drain().await;

    let seen = hook.seen.lock().unwrap().clone();
    assert_eq!(seen, vec![(RICKROLL_URL.to_string(), true, true)]);
    assert_eq!(firewall.history().len(), 1);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_watcher_feeds_firewall() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recently-used.xbel");
    std::fs::write(
        &path,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xbel version="1.0">
  <bookmark href="file:///home/user/notes.txt" visited="2024-05-01T10:00:00Z"/>
  <bookmark href="{SAFE_URL}" visited="2024-05-01T10:30:00Z"/>
  <bookmark href="{RICKROLL_URL}" visited="2024-05-01T11:00:00Z"/>
</xbel>
"#
        ),
    )
    .unwrap();

    let monitor = LinkMonitor::new();
    let firewall = firewall();
    let recorder = Arc::new(Recorder::default());
    monitor.subscribe(firewall.clone(), SubscribeOptions::default());
    monitor.subscribe(recorder.clone(), SubscribeOptions::default());

    let watcher = Arc::new(RecentLinkWatcher::new(
        WatcherConfig::new(&path).with_poll_interval(Duration::from_millis(50)),
    ));
    monitor.register_source(watcher.clone());
    assert_eq!(watcher.state(), WatcherState::Started);

    assert!(common::wait_until(|| recorder.seen().len() == 2).await);
    // Later polls of the unchanged file emit nothing new.
    tokio::time::sleep(Duration::from_millis(150)).await;
    monitor.drain().await;

    let seen = recorder.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].url, SAFE_URL);
    assert!(!seen[0].blocked);
    assert_eq!(seen[1].url, RICKROLL_URL);
    assert!(seen[1].blocked);
    assert_eq!(firewall.history().len(), 1);

    monitor.shutdown().await;
    watcher.shutdown().await;
    assert_eq!(watcher.state(), WatcherState::Stopped);
}

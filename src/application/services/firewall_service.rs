//! Link firewall: classifies events once and blocks positives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::application::subscription::LinkEventHandler;
use crate::domain::link_event::ANALYSIS_KEY;
use crate::domain::{BaitDetector, ClassificationResult, Classifier, LinkEvent};

/// Identifier written to [`LinkEvent::blocked_by`].
pub const FIREWALL_ID: &str = "LinkFirewall";

/// Default number of block records retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// One entry of the firewall's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRecord {
    pub url: String,
    pub when: DateTime<Utc>,
    pub reason: String,
}

/// Service coordinating detection and blocking state.
///
/// Each event is classified at most once: the result is memoized in the
/// event's metadata, so an event that reaches the firewall twice (or is
/// inspected again by an [`crate::application::OnLinkOpen`] adapter) reuses
/// the first verdict. Positive verdicts block the event and append a
/// [`BlockRecord`] to a bounded ring, oldest records dropped first.
pub struct FirewallService<C: Classifier = BaitDetector> {
    classifier: Arc<C>,
    history: Mutex<VecDeque<BlockRecord>>,
    capacity: usize,
}

impl<C: Classifier> FirewallService<C> {
    /// Creates a firewall keeping [`DEFAULT_HISTORY_CAPACITY`] records.
    pub fn new(classifier: Arc<C>) -> Self {
        Self::with_capacity(classifier, DEFAULT_HISTORY_CAPACITY)
    }

    /// Creates a firewall keeping at most `capacity` records (minimum 1).
    pub fn with_capacity(classifier: Arc<C>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            classifier,
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Classifies an event and blocks it if it matched.
    ///
    /// Returns the classification whether or not it matched. Safe to call
    /// concurrently for distinct events.
    pub fn inspect(&self, event: &mut LinkEvent) -> ClassificationResult {
        let result = match cached_analysis(event) {
            Some(result) => result,
            None => {
                let result = self.classifier.analyze(&event.url);
                if let Ok(value) = serde_json::to_value(&result) {
                    event.metadata.insert(ANALYSIS_KEY.to_string(), value);
                }
                result
            }
        };

        if result.is_match && event.block(result.reason.clone(), FIREWALL_ID) {
            self.record(BlockRecord {
                url: event.url.clone(),
                when: event.timestamp,
                reason: result.reason.clone(),
            });
            warn!(
                url = %event.url,
                pattern = result.matched_pattern.as_deref().unwrap_or_default(),
                "Blocked Rickroll attempt"
            );
        } else if !result.is_match {
            debug!(url = %event.url, confidence = result.confidence, "Link allowed");
        }

        result
    }

    /// Classifies a bare URL without touching any event or history.
    pub fn classify(&self, url: &str) -> ClassificationResult {
        self.classifier.analyze(url)
    }

    /// Returns a copy of the audit trail, newest last.
    pub fn history(&self) -> Vec<BlockRecord> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn record(&self, record: BlockRecord) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(record);
    }
}

fn cached_analysis(event: &LinkEvent) -> Option<ClassificationResult> {
    let value = event.metadata.get(ANALYSIS_KEY)?;
    serde_json::from_value(value.clone()).ok()
}

#[async_trait]
impl<C: Classifier + 'static> LinkEventHandler for FirewallService<C> {
    async fn handle(&self, event: &mut LinkEvent) -> anyhow::Result<()> {
        self.inspect(event);
        Ok(())
    }
}

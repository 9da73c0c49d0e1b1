//! Link event model for asynchronous link monitoring.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Metadata key holding the memoized [`crate::domain::ClassificationResult`].
pub const ANALYSIS_KEY: &str = "analysis";

/// Metadata key recording when the event was first blocked.
pub const BLOCKED_AT_KEY: &str = "blocked_at";

/// A single observed link-open occurrence.
///
/// Created by an event source (typically
/// [`crate::infrastructure::watcher::RecentLinkWatcher`]) and handed to the
/// monitor, which passes it by mutable reference to every subscriber in turn.
/// The firewall is the only component expected to mutate it.
///
/// # Usage Flow
///
/// 1. Created by a watcher for every new bookmark entry
/// 2. Published to [`crate::application::services::LinkMonitor`]
/// 3. Inspected (and possibly blocked) by
///    [`crate::application::services::FirewallService`]
/// 4. Observed by the remaining subscribers, then dropped
#[derive(Debug, Clone)]
pub struct LinkEvent {
    pub url: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: HashMap<String, Value>,
    pub blocked: bool,
    pub blocked_by: Option<String>,
    pub block_reason: Option<String>,
}

impl LinkEvent {
    /// Creates a new, unblocked event stamped with the current time.
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
            blocked: false,
            blocked_by: None,
            block_reason: None,
        }
    }

    /// Attaches provenance metadata to the event.
    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Marks the event as blocked.
    ///
    /// The transition happens at most once: blocking an already blocked event
    /// leaves `blocked_by`, `block_reason` and `blocked_at` untouched.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn block(&mut self, reason: impl Into<String>, blocked_by: impl Into<String>) -> bool {
        if self.blocked {
            return false;
        }

        self.blocked = true;
        self.block_reason = Some(reason.into());
        self.blocked_by = Some(blocked_by.into());
        self.metadata
            .entry(BLOCKED_AT_KEY.to_string())
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)));

        true
    }

    /// Returns the time of the first block, if any.
    pub fn blocked_at(&self) -> Option<&str> {
        self.metadata.get(BLOCKED_AT_KEY).and_then(Value::as_str)
    }
}

//! Subscriber contract for the link monitor.

use std::fmt;

use async_trait::async_trait;

use crate::domain::LinkEvent;

/// Opaque handle identifying one registration with
/// [`crate::application::services::LinkMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{:04x}", self.0)
    }
}

/// Delivery filter for a subscription.
///
/// An event is delivered when it is blocked and `include_blocked` is set, or
/// when it is not blocked and `include_safe` is set. The default passes
/// everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub include_safe: bool,
    pub include_blocked: bool,
}

impl SubscribeOptions {
    /// Deliver only events that ended up blocked.
    pub fn blocked_only() -> Self {
        Self {
            include_safe: false,
            include_blocked: true,
        }
    }

    /// Deliver only events that were not blocked.
    pub fn safe_only() -> Self {
        Self {
            include_safe: true,
            include_blocked: false,
        }
    }

    /// Returns whether an event in its current state passes the filter.
    pub fn accepts(&self, event: &LinkEvent) -> bool {
        if event.blocked {
            self.include_blocked
        } else {
            self.include_safe
        }
    }
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self {
            include_safe: true,
            include_blocked: true,
        }
    }
}

/// Receives link events from the monitor's dispatch loop.
///
/// Handlers run one at a time for a given event and may mutate it; later
/// handlers observe the mutation. A handler that needs concurrency must spawn
/// its own work. Errors are logged by the monitor together with the
/// subscription token and never affect other handlers.
#[async_trait]
pub trait LinkEventHandler: Send + Sync {
    async fn handle(&self, event: &mut LinkEvent) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display() {
        assert_eq!(SubscriptionToken::new(10).to_string(), "sub-000a");
    }

    #[test]
    fn test_default_options_accept_everything() {
        let options = SubscribeOptions::default();
        let mut event = LinkEvent::new("https://example.com", "test");

        assert!(options.accepts(&event));
        event.block("bait", "test");
        assert!(options.accepts(&event));
    }

    #[test]
    fn test_filters_follow_blocked_state() {
        let mut event = LinkEvent::new("https://example.com", "test");

        assert!(SubscribeOptions::safe_only().accepts(&event));
        assert!(!SubscribeOptions::blocked_only().accepts(&event));

        event.block("bait", "test");

        assert!(!SubscribeOptions::safe_only().accepts(&event));
        assert!(SubscribeOptions::blocked_only().accepts(&event));
    }
}

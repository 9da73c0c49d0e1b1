//! Producers feeding the link monitor.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::LinkEvent;

/// A producer of link events.
///
/// Sources are registered with
/// [`crate::application::services::LinkMonitor::register_source`] and started
/// exactly once, when the monitor starts. `start` must not block: it spawns
/// whatever background work it needs and returns. The source stops when
/// `shutdown` is cancelled.
pub trait EventSource: Send + Sync {
    /// Short human-readable name used in logs.
    fn name(&self) -> &str;

    /// Starts producing events into `publisher`.
    fn start(&self, publisher: EventPublisher, shutdown: CancellationToken);
}

/// Cloneable handle for enqueueing events on a monitor.
///
/// Publishing never blocks and never fails for the caller.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: mpsc::UnboundedSender<LinkEvent>,
    pending: Arc<AtomicUsize>,
}

impl EventPublisher {
    pub(crate) fn new(sender: mpsc::UnboundedSender<LinkEvent>, pending: Arc<AtomicUsize>) -> Self {
        Self { sender, pending }
    }

    /// Enqueues an event for dispatch.
    pub fn publish(&self, event: LinkEvent) {
        self.pending.fetch_add(1, Ordering::AcqRel);

        if let Err(mpsc::error::SendError(event)) = self.sender.send(event) {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            debug!(url = %event.url, "Monitor stopped, dropping link event");
        }
    }

    /// Number of events enqueued but not yet fully dispatched.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }
}

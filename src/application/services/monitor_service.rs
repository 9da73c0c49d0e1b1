//! Asynchronous dispatcher relaying link events to subscribers.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::application::event_source::{EventPublisher, EventSource};
use crate::application::subscription::{LinkEventHandler, SubscribeOptions, SubscriptionToken};
use crate::domain::LinkEvent;

/// Lifecycle of a monitor. Only `Created -> Started` and `* -> Stopped`
/// transitions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Created,
    Started,
    Stopped,
}

struct Subscription {
    handler: Arc<dyn LinkEventHandler>,
    options: SubscribeOptions,
}

type Registry = RwLock<BTreeMap<SubscriptionToken, Arc<Subscription>>>;

struct Lifecycle {
    state: MonitorState,
    queue: Option<mpsc::UnboundedReceiver<LinkEvent>>,
    dispatch: Option<JoinHandle<()>>,
    sources: Vec<Arc<dyn EventSource>>,
}

struct MonitorInner {
    lifecycle: Mutex<Lifecycle>,
    subscribers: Arc<Registry>,
    publisher: EventPublisher,
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
    next_token: AtomicU64,
    shutdown: CancellationToken,
}

impl MonitorInner {
    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for MonitorInner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Decouples link event producers from consumers.
///
/// Holds an unbounded FIFO queue and a registry of subscribers. A single
/// dispatch task drains the queue and delivers each event to every subscriber
/// whose [`SubscribeOptions`] accept it, one handler at a time, in
/// registration order. Handlers see the event as left by the handlers before
/// them, so a firewall registered first lets later subscribers observe the
/// blocked state.
///
/// Cloning is cheap and yields a handle to the same monitor.
///
/// # Runtime
///
/// [`LinkMonitor::ensure_running`] and [`LinkMonitor::subscribe`] spawn tokio
/// tasks and must be called from within a tokio runtime.
#[derive(Clone)]
pub struct LinkMonitor {
    inner: Arc<MonitorInner>,
}

impl LinkMonitor {
    pub fn new() -> Self {
        let (sender, queue) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        Self {
            inner: Arc::new(MonitorInner {
                lifecycle: Mutex::new(Lifecycle {
                    state: MonitorState::Created,
                    queue: Some(queue),
                    dispatch: None,
                    sources: Vec::new(),
                }),
                subscribers: Arc::new(RwLock::new(BTreeMap::new())),
                publisher: EventPublisher::new(sender, pending.clone()),
                pending,
                idle: Arc::new(Notify::new()),
                next_token: AtomicU64::new(1),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Adds a producer.
    ///
    /// The source is started right away if the dispatch loop is running,
    /// otherwise when it starts. Sources registered after shutdown are never
    /// started.
    pub fn register_source(&self, source: Arc<dyn EventSource>) {
        let mut lifecycle = self.inner.lifecycle();
        if lifecycle.state == MonitorState::Started {
            self.start_source(source.as_ref());
        }
        lifecycle.sources.push(source);
    }

    /// Registers a handler and ensures the dispatch loop is running.
    pub fn subscribe(
        &self,
        handler: Arc<dyn LinkEventHandler>,
        options: SubscribeOptions,
    ) -> SubscriptionToken {
        let token = SubscriptionToken::new(self.inner.next_token.fetch_add(1, Ordering::Relaxed));

        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, Arc::new(Subscription { handler, options }));
        debug!(subscription = %token, ?options, "Link handler subscribed");

        self.ensure_running();
        token
    }

    /// Removes a handler. Unknown tokens are ignored.
    ///
    /// Returns `true` if a subscription was removed. An event already being
    /// dispatched may still reach the removed handler.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let removed = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&token)
            .is_some();

        if removed {
            debug!(subscription = %token, "Link handler unsubscribed");
        }
        removed
    }

    /// Enqueues an event. Never blocks.
    pub fn publish(&self, event: LinkEvent) {
        self.inner.publisher.publish(event);
    }

    /// Returns a handle producers can publish through.
    pub fn publisher(&self) -> EventPublisher {
        self.inner.publisher.clone()
    }

    /// Starts the dispatch loop and all registered sources.
    ///
    /// Idempotent: only the first call on a freshly created monitor has an
    /// effect, no matter how many callers race here.
    pub fn ensure_running(&self) {
        let mut lifecycle = self.inner.lifecycle();
        if lifecycle.state != MonitorState::Created {
            return;
        }
        let Some(queue) = lifecycle.queue.take() else {
            return;
        };

        let dispatcher = Dispatcher {
            subscribers: self.inner.subscribers.clone(),
            pending: self.inner.pending.clone(),
            idle: self.inner.idle.clone(),
            shutdown: self.inner.shutdown.clone(),
        };
        lifecycle.dispatch = Some(tokio::spawn(dispatcher.run(queue)));
        lifecycle.state = MonitorState::Started;

        for source in &lifecycle.sources {
            self.start_source(source.as_ref());
        }

        info!(sources = lifecycle.sources.len(), "Link monitor started");
    }

    /// Waits until every event published so far has been dispatched.
    ///
    /// Returns immediately when the dispatch loop is not running. This is a
    /// flushing aid, not a barrier against concurrent publishers.
    pub async fn drain(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.pending() == 0 || !self.is_running() {
                return;
            }

            notified.await;
        }
    }

    /// Cancels the dispatch loop and every source, then waits for the loop
    /// to exit. Events published afterwards are dropped.
    pub async fn shutdown(&self) {
        let dispatch = {
            let mut lifecycle = self.inner.lifecycle();
            lifecycle.state = MonitorState::Stopped;
            // Never started: close the queue so later publishes fail fast.
            lifecycle.queue.take();
            lifecycle.dispatch.take()
        };

        self.inner.shutdown.cancel();

        if let Some(handle) = dispatch
            && let Err(e) = handle.await
        {
            warn!("Link dispatch task ended abnormally: {}", e);
        }

        info!("Link monitor stopped");
    }

    pub fn state(&self) -> MonitorState {
        self.inner.lifecycle().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == MonitorState::Started && !self.inner.shutdown.is_cancelled()
    }

    /// Number of events enqueued but not yet fully dispatched.
    pub fn pending(&self) -> usize {
        self.inner.publisher.pending()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn start_source(&self, source: &dyn EventSource) {
        source.start(self.publisher(), self.inner.shutdown.child_token());
        debug!(source = source.name(), "Link event source started");
    }
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// State owned by the dispatch task.
///
/// Holds no handle to the monitor, so dropping every [`LinkMonitor`] handle
/// cancels the loop.
struct Dispatcher {
    subscribers: Arc<Registry>,
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
    shutdown: CancellationToken,
}

impl Dispatcher {
    async fn run(self, mut queue: mpsc::UnboundedReceiver<LinkEvent>) {
        debug!("Link dispatch loop started");

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                next = queue.recv() => {
                    let Some(mut event) = next else { break };

                    tokio::select! {
                        biased;
                        _ = self.shutdown.cancelled() => break,
                        _ = self.deliver(&mut event) => {}
                    }

                    if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
                        self.idle.notify_waiters();
                    }
                }
            }
        }

        self.idle.notify_waiters();
        debug!("Link dispatch loop stopped");
    }

    async fn deliver(&self, event: &mut LinkEvent) {
        let snapshot: Vec<(SubscriptionToken, Arc<Subscription>)> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(token, subscription)| (*token, subscription.clone()))
            .collect();

        for (token, subscription) in snapshot {
            if !subscription.options.accepts(event) {
                continue;
            }

            if let Err(e) = subscription.handler.handle(event).await {
                error!(
                    subscription = %token,
                    url = %event.url,
                    "Unhandled error in link handler: {:#}",
                    e
                );
            }
        }
    }
}

//! Controller-facing adapter pairing each event with its classification.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::services::{FirewallService, LinkMonitor};
use crate::application::subscription::{LinkEventHandler, SubscribeOptions, SubscriptionToken};
use crate::domain::{BaitDetector, ClassificationResult, Classifier, LinkEvent};

/// A consumer that wants every link together with its verdict.
#[async_trait]
pub trait LinkOpenHook: Send + Sync {
    async fn on_link_open(
        &self,
        event: &LinkEvent,
        analysis: &ClassificationResult,
    ) -> anyhow::Result<()>;
}

/// Wraps a [`LinkOpenHook`] so it can subscribe to a [`LinkMonitor`].
///
/// The firewall runs before the hook regardless of where the hook sits in
/// the delivery order, so the hook always sees post-inspection state. The
/// memoized classification keeps this cheap when the firewall already ran.
///
/// The adapter subscribes with a pass-all monitor filter and applies its own
/// [`SubscribeOptions`] after inspection; filtering at the monitor would judge
/// the event before it was classified. Links that did not match are skipped
/// unless `include_safe` is set.
pub struct OnLinkOpen<H, C: Classifier = BaitDetector> {
    hook: H,
    firewall: Arc<FirewallService<C>>,
    options: SubscribeOptions,
}

impl<H, C> OnLinkOpen<H, C>
where
    H: LinkOpenHook + 'static,
    C: Classifier + 'static,
{
    pub fn new(hook: H, firewall: Arc<FirewallService<C>>, options: SubscribeOptions) -> Self {
        Self {
            hook,
            firewall,
            options,
        }
    }

    /// Subscribes `hook` to `monitor`, filtering with `options` once the
    /// event has been inspected.
    pub fn register(
        monitor: &LinkMonitor,
        firewall: Arc<FirewallService<C>>,
        hook: H,
        options: SubscribeOptions,
    ) -> SubscriptionToken {
        let adapter = Self::new(hook, firewall, options);
        monitor.subscribe(Arc::new(adapter), SubscribeOptions::default())
    }
}

#[async_trait]
impl<H, C> LinkEventHandler for OnLinkOpen<H, C>
where
    H: LinkOpenHook + 'static,
    C: Classifier + 'static,
{
    async fn handle(&self, event: &mut LinkEvent) -> anyhow::Result<()> {
        let analysis = self.firewall.inspect(event);
        if !self.options.accepts(event) || (!analysis.is_match && !self.options.include_safe) {
            return Ok(());
        }

        self.hook.on_link_open(event, &analysis).await
    }
}

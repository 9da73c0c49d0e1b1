//! Hook that reports link verdicts to the log.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::hooks::LinkOpenHook;
use crate::domain::{ClassificationResult, LinkEvent};

/// Logs blocked links at `INFO` and allowed links at `DEBUG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogHook;

#[async_trait]
impl LinkOpenHook for AuditLogHook {
    async fn on_link_open(
        &self,
        event: &LinkEvent,
        analysis: &ClassificationResult,
    ) -> anyhow::Result<()> {
        if event.blocked {
            info!(
                url = %event.url,
                source = %event.source,
                reason = event.block_reason.as_deref().unwrap_or_default(),
                "Blocked Rickroll attempt"
            );
        } else {
            debug!(
                url = %event.url,
                confidence = format_args!("{:.2}", analysis.confidence),
                "Allowed link"
            );
        }
        Ok(())
    }
}

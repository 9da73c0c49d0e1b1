//! Classifier trait definition.

use crate::domain::ClassificationResult;

/// Classifies a URL as bait or not.
///
/// Implementations must be pure: the same URL always yields the same result
/// and no shared state is touched.
///
/// # Implementations
///
/// - [`crate::domain::BaitDetector`] - fixed signature and keyword heuristics
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Classifies a single URL.
    fn analyze(&self, url: &str) -> ClassificationResult;
}

//! Classification outcome produced by a [`crate::domain::Classifier`].

use serde::{Deserialize, Serialize};

/// Confidence reported for an exact signature hit.
pub const EXACT_CONFIDENCE: f64 = 1.0;

/// Confidence reported for a loose keyword hit.
pub const HEURISTIC_CONFIDENCE: f64 = 0.7;

/// Confidence reported when nothing matched.
pub const NO_MATCH_CONFIDENCE: f64 = 0.1;

/// Result of classifying a single URL.
///
/// Serializable so it can be memoized in [`crate::domain::LinkEvent::metadata`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_match: bool,
    pub reason: String,
    pub matched_pattern: Option<String>,
    pub confidence: f64,
}

impl ClassificationResult {
    /// A positive result for an exact signature.
    pub fn exact(pattern: &str, reason: impl Into<String>) -> Self {
        Self {
            is_match: true,
            reason: reason.into(),
            matched_pattern: Some(pattern.to_string()),
            confidence: EXACT_CONFIDENCE,
        }
    }

    /// A positive result for a loose heuristic.
    pub fn heuristic(pattern: &str, reason: impl Into<String>) -> Self {
        Self {
            is_match: true,
            reason: reason.into(),
            matched_pattern: Some(pattern.to_string()),
            confidence: HEURISTIC_CONFIDENCE,
        }
    }

    /// A negative result.
    pub fn no_match(reason: impl Into<String>) -> Self {
        Self {
            is_match: false,
            reason: reason.into(),
            matched_pattern: None,
            confidence: NO_MATCH_CONFIDENCE,
        }
    }
}

//! DTOs for the link monitor endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::BlockRecord;
use crate::domain::ClassificationResult;

/// Blocked link history, oldest first.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total: usize,
    pub capacity: usize,
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub url: String,
    pub when: DateTime<Utc>,
    pub reason: String,
}

impl From<BlockRecord> for HistoryItem {
    fn from(record: BlockRecord) -> Self {
        Self {
            url: record.url,
            when: record.when,
            reason: record.reason,
        }
    }
}

/// Request to classify a single URL.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub url: String,
}

/// Verdict for a single URL.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub url: String,
    pub is_match: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
    pub confidence: f64,
}

impl CheckResponse {
    pub fn new(url: String, result: ClassificationResult) -> Self {
        Self {
            url,
            is_match: result.is_match,
            reason: result.reason,
            matched_pattern: result.matched_pattern,
            confidence: result.confidence,
        }
    }
}

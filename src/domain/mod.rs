//! Domain layer containing link events and classification logic.
//!
//! This module has no dependencies on the runtime, the file system or the
//! HTTP layer.
//!
//! # Architecture
//!
//! - [`link_event`] - The event flowing through the monitor
//! - [`classification`] - Outcome of classifying a URL
//! - [`classifier`] - Classification trait (mocked in tests)
//! - [`bait_detector`] - The fixed heuristic classifier
//!
//! # Link Processing Flow
//!
//! 1. A watcher observes a new bookmark entry and builds a [`LinkEvent`]
//! 2. The event is published to the monitor queue
//! 3. The firewall runs a [`Classifier`] over it and blocks positives
//! 4. Remaining subscribers observe the post-inspection event

pub mod bait_detector;
pub mod classification;
pub mod classifier;
pub mod link_event;

pub use bait_detector::BaitDetector;
pub use classification::ClassificationResult;
pub use classifier::Classifier;
pub use link_event::LinkEvent;

#[cfg(test)]
pub use classifier::MockClassifier;

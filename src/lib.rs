//! # Link Firewall
//!
//! Watches the desktop's recently opened links and blocks known bait links
//! before any other consumer acts on them.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Link events, classifier trait and the bait detector
//! - **Application Layer** ([`application`]) - Event monitor, firewall and subscriber hooks
//! - **Infrastructure Layer** ([`infrastructure`]) - Bookmark file watcher
//! - **API Layer** ([`api`]) - Optional read-only HTTP surface
//!
//! ## Event Flow
//!
//! ```text
//! recently-used.xbel -> RecentLinkWatcher -> LinkMonitor -> FirewallService -> hooks
//! ```
//!
//! The firewall subscribes first, so every later handler sees the event
//! already blocked or allowed.
//!
//! ## Quick Start
//!
//! ```bash
//! # Optional: expose /health and /link-monitor/*
//! export LISTEN="127.0.0.1:3000"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Runtime configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{FirewallService, LinkMonitor, MonitorState};
    pub use crate::application::{
        EventSource, LinkEventHandler, LinkOpenHook, OnLinkOpen, SubscribeOptions,
        SubscriptionToken,
    };
    pub use crate::domain::{BaitDetector, ClassificationResult, Classifier, LinkEvent};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}

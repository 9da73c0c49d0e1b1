//! HTTP request handlers for API endpoints.

pub mod health;
pub mod link_monitor;

pub use health::health_handler;
pub use link_monitor::{check_handler, history_handler};

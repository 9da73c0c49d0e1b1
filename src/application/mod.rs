//! Application layer: event dispatch, firewall and subscriber contracts.
//!
//! This layer orchestrates the domain classifier and the event producers. It
//! provides the API the binary and the HTTP handlers call into.
//!
//! # Available Services
//!
//! - [`services::monitor_service::LinkMonitor`] - Event queue and subscriber fan-out
//! - [`services::firewall_service::FirewallService`] - Exactly-once classification and blocking
//!
//! # Contracts
//!
//! - [`subscription::LinkEventHandler`] - Raw monitor subscriber
//! - [`event_source::EventSource`] - Producer started by the monitor
//! - [`hooks::LinkOpenHook`] - Consumer receiving `(event, analysis)` pairs

pub mod audit_hook;
pub mod event_source;
pub mod hooks;
pub mod services;
pub mod subscription;

pub use audit_hook::AuditLogHook;
pub use event_source::{EventPublisher, EventSource};
pub use hooks::{LinkOpenHook, OnLinkOpen};
pub use subscription::{LinkEventHandler, SubscribeOptions, SubscriptionToken};

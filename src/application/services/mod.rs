//! Business logic services for the application layer.

pub mod firewall_service;
pub mod monitor_service;

pub use firewall_service::{BlockRecord, FirewallService};
pub use monitor_service::{LinkMonitor, MonitorState};

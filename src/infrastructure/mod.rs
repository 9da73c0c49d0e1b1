//! Infrastructure layer: integrations with the desktop environment.
//!
//! # Modules
//!
//! - [`watcher`] - Polling source over the recently used bookmark file

pub mod watcher;

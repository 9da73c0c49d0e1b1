//! Event source backed by the desktop's recently used bookmark list.
//!
//! - [`RecentLinkWatcher`] - Polling [`crate::application::EventSource`]
//! - [`RecentLinkReader`] - One poll: read, parse, deduplicate
//! - [`DedupWindow`] - Bounded memory of seen entries
//! - [`xbel`] - Bookmark file parser

mod dedup_window;
mod recent_watcher;
pub mod xbel;

pub use dedup_window::{DEFAULT_DEDUP_WINDOW, DedupWindow};
pub use recent_watcher::{
    DEFAULT_POLL_INTERVAL, RecentLinkReader, RecentLinkWatcher, WatchError, WatcherConfig,
    WatcherState,
};

//! Polling watcher over the desktop's recently used links.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::dedup_window::DedupWindow;
use super::xbel::{Bookmark, parse_bookmarks};
use crate::application::{EventPublisher, EventSource};
use crate::domain::LinkEvent;
use crate::utils::web_url::is_web_link;

/// Default delay between two reads of the bookmark file.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors from a single poll of the bookmark file.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The file does not exist (yet). Expected, retried on the next tick.
    #[error("Recent links file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Malformed bookmark file: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("Bookmark reader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Watcher settings.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub recent_file: PathBuf,
    pub poll_interval: Duration,
    pub dedup_window: usize,
}

impl WatcherConfig {
    pub fn new(recent_file: impl Into<PathBuf>) -> Self {
        Self {
            recent_file: recent_file.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            dedup_window: super::dedup_window::DEFAULT_DEDUP_WINDOW,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_dedup_window(mut self, dedup_window: usize) -> Self {
        self.dedup_window = dedup_window;
        self
    }
}

/// Turns the bookmark file into new events, each entry at most once per
/// dedup window.
///
/// Owns the [`DedupWindow`]; nothing else reads or writes it.
#[derive(Debug)]
pub struct RecentLinkReader {
    path: PathBuf,
    window: DedupWindow,
}

impl RecentLinkReader {
    pub fn new(path: impl Into<PathBuf>, window: usize) -> Self {
        Self {
            path: path.into(),
            window: DedupWindow::new(window),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn window(&self) -> &DedupWindow {
        &self.window
    }

    /// Reads the file once on the blocking pool and returns unseen web links.
    ///
    /// The window is only updated after a successful read, so a failed or
    /// cancelled poll leaves no trace.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Missing`] when the file is absent and another
    /// [`WatchError`] variant for any other failure.
    pub async fn poll(&mut self) -> Result<Vec<LinkEvent>, WatchError> {
        let path = self.path.clone();
        let bookmarks = tokio::task::spawn_blocking(move || read_bookmark_file(&path)).await??;
        Ok(self.admit(bookmarks))
    }

    /// Filters out non-web and already seen entries, remembering the rest.
    pub fn admit(&mut self, bookmarks: Vec<Bookmark>) -> Vec<LinkEvent> {
        let source = self.path.display().to_string();

        bookmarks
            .into_iter()
            .filter(|bookmark| is_web_link(&bookmark.href))
            .filter(|bookmark| self.window.insert(bookmark.entry_id()))
            .map(|bookmark| bookmark.into_event(&source))
            .collect()
    }
}

fn read_bookmark_file(path: &Path) -> Result<Vec<Bookmark>, WatchError> {
    let xml = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => WatchError::Missing(path.to_path_buf()),
        _ => WatchError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Ok(parse_bookmarks(&xml)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Created,
    Started,
    Stopped,
}

struct WatcherLifecycle {
    state: WatcherState,
    task: Option<JoinHandle<()>>,
    shutdown: Option<CancellationToken>,
}

/// Event source polling the freedesktop `recently-used.xbel` file.
///
/// # Polling Cycle
///
/// 1. Read and parse the file on a blocking thread
/// 2. Publish every web link not already in the dedup window
/// 3. Sleep for the poll interval, whatever the outcome
///
/// A missing file is silently retried. Other failures are logged and the
/// cycle carries on. Cancelling the shutdown token stops the cycle at once,
/// including mid-read.
pub struct RecentLinkWatcher {
    config: WatcherConfig,
    lifecycle: Mutex<WatcherLifecycle>,
}

impl RecentLinkWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        Self {
            config,
            lifecycle: Mutex::new(WatcherLifecycle {
                state: WatcherState::Created,
                task: None,
                shutdown: None,
            }),
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Current lifecycle state. A cycle cancelled through its token (for
    /// example by the monitor shutting down) reports `Stopped`.
    pub fn state(&self) -> WatcherState {
        let lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        match lifecycle.shutdown {
            Some(ref token) if token.is_cancelled() => WatcherState::Stopped,
            _ => lifecycle.state,
        }
    }

    /// Cancels the polling cycle and waits for it to finish.
    pub async fn shutdown(&self) {
        let task = {
            let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
            lifecycle.state = WatcherState::Stopped;
            if let Some(shutdown) = lifecycle.shutdown.take() {
                shutdown.cancel();
            }
            lifecycle.task.take()
        };

        if let Some(task) = task
            && let Err(e) = task.await
        {
            warn!("Recent link watcher ended abnormally: {}", e);
        }
    }
}

impl EventSource for RecentLinkWatcher {
    fn name(&self) -> &str {
        "recent-link-watcher"
    }

    /// Spawns the polling cycle. A no-op unless the watcher is freshly
    /// created.
    fn start(&self, publisher: EventPublisher, shutdown: CancellationToken) {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        if lifecycle.state != WatcherState::Created {
            return;
        }

        let reader = RecentLinkReader::new(&self.config.recent_file, self.config.dedup_window);
        let task = tokio::spawn(watch_loop(
            reader,
            self.config.poll_interval,
            publisher,
            shutdown.clone(),
        ));

        lifecycle.task = Some(task);
        lifecycle.shutdown = Some(shutdown);
        lifecycle.state = WatcherState::Started;

        info!(
            file = %self.config.recent_file.display(),
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "Recent link watcher started"
        );
    }
}

async fn watch_loop(
    mut reader: RecentLinkReader,
    poll_interval: Duration,
    publisher: EventPublisher,
    shutdown: CancellationToken,
) {
    loop {
        let outcome = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            outcome = reader.poll() => outcome,
        };

        match outcome {
            Ok(events) => {
                if !events.is_empty() {
                    debug!(count = events.len(), "New recent links");
                }
                for event in events {
                    publisher.publish(event);
                }
            }
            Err(WatchError::Missing(path)) => {
                debug!(file = %path.display(), "Recent links file not present yet");
            }
            Err(e) => {
                warn!("Failed to read recent link entries: {}", e);
            }
        }

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(poll_interval) => {}
        }
    }

    debug!("Recent link watcher stopped");
}

//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the monitor starts.
//!
//! ## Optional Variables
//!
//! - `RECENT_LINKS_FILE` - Bookmark file to watch (default:
//!   `$XDG_DATA_HOME/recently-used.xbel`, then `$HOME/.local/share/recently-used.xbel`)
//! - `POLL_INTERVAL_MS` - Watcher poll period (default: 1000, range: 50..=60000)
//! - `DEDUP_WINDOW` - Remembered entry identities (default: 1024, range: 1..=1000000)
//! - `HISTORY_CAPACITY` - Blocked link history size (default: 200, range: 1..=100000)
//! - `LISTEN` - Bind address; the HTTP surface is disabled when unset
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const RECENT_FILE_NAME: &str = "recently-used.xbel";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub recent_links_file: PathBuf,
    pub poll_interval_ms: u64,
    pub dedup_window: usize,
    pub history_capacity: usize,
    /// HTTP bind address. `None` runs the monitor headless.
    pub listen_addr: Option<String>,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but unparsable, or if no
    /// bookmark file location can be derived.
    pub fn from_env() -> Result<Self> {
        let recent_links_file =
            Self::load_recent_links_file().context("Failed to locate the recent links file")?;

        let poll_interval_ms = parse_var("POLL_INTERVAL_MS", 1000)?;
        let dedup_window = parse_var("DEDUP_WINDOW", 1024)?;
        let history_capacity = parse_var("HISTORY_CAPACITY", 200)?;

        let listen_addr = env::var("LISTEN").ok().filter(|v| !v.trim().is_empty());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            recent_links_file,
            poll_interval_ms,
            dedup_window,
            history_capacity,
            listen_addr,
            log_level,
            log_format,
        })
    }

    /// Resolves the bookmark file path.
    ///
    /// Priority:
    /// 1. `RECENT_LINKS_FILE`
    /// 2. `$XDG_DATA_HOME/recently-used.xbel`
    /// 3. `$HOME/.local/share/recently-used.xbel`
    pub fn load_recent_links_file() -> Result<PathBuf> {
        if let Ok(path) = env::var("RECENT_LINKS_FILE")
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        if let Ok(data_home) = env::var("XDG_DATA_HOME")
            && !data_home.is_empty()
        {
            return Ok(PathBuf::from(data_home).join(RECENT_FILE_NAME));
        }

        let home = env::var("HOME")
            .context("HOME must be set when neither RECENT_LINKS_FILE nor XDG_DATA_HOME is")?;

        Ok(PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(RECENT_FILE_NAME))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a numeric setting is out of range
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is set but not `host:port`
    pub fn validate(&self) -> Result<()> {
        if !(50..=60_000).contains(&self.poll_interval_ms) {
            anyhow::bail!(
                "POLL_INTERVAL_MS must be between 50 and 60000, got {}",
                self.poll_interval_ms
            );
        }

        if !(1..=1_000_000).contains(&self.dedup_window) {
            anyhow::bail!(
                "DEDUP_WINDOW must be between 1 and 1000000, got {}",
                self.dedup_window
            );
        }

        if !(1..=100_000).contains(&self.history_capacity) {
            anyhow::bail!(
                "HISTORY_CAPACITY must be between 1 and 100000, got {}",
                self.history_capacity
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if let Some(ref addr) = self.listen_addr
            && !addr.contains(':')
        {
            anyhow::bail!("LISTEN must be in format 'host:port', got '{}'", addr);
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Returns whether the HTTP surface is enabled.
    pub fn is_http_enabled(&self) -> bool {
        self.listen_addr.is_some()
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Recent links file: {}", self.recent_links_file.display());
        tracing::info!("  Poll interval: {}ms", self.poll_interval_ms);
        tracing::info!("  Dedup window: {}", self.dedup_window);
        tracing::info!("  History capacity: {}", self.history_capacity);

        match self.listen_addr {
            Some(ref addr) => tracing::info!("  HTTP: {} (enabled)", addr),
            None => tracing::info!("  HTTP: disabled"),
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Reads a numeric variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

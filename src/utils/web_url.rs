//! Web URL validation helpers.
//!
//! Bookmark files record every kind of URI (`file://`, `trash://`, `recent://`
//! ...). Only `http` and `https` links are treated as web links.

use url::Url;

/// Errors returned when a string is not a usable web URL.
#[derive(Debug, thiserror::Error)]
pub enum WebUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Parses `input` and checks its scheme.
///
/// # Errors
///
/// Returns [`WebUrlError::InvalidFormat`] for malformed URLs.
/// Returns [`WebUrlError::UnsupportedProtocol`] for non-HTTP(S) schemes.
pub fn parse_web_url(input: &str) -> Result<Url, WebUrlError> {
    let url = Url::parse(input.trim()).map_err(|e| WebUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(WebUrlError::UnsupportedProtocol),
    }
}

/// Returns whether `href` is an `http`/`https` URL.
pub fn is_web_link(href: &str) -> bool {
    parse_web_url(href).is_ok()
}

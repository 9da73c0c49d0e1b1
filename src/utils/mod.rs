//! Shared helpers.

pub mod web_url;

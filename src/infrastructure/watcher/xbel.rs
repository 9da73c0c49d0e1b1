//! Reader for the freedesktop "recently used" XBEL bookmark list.
//!
//! The file looks like:
//!
//! ```xml
//! <xbel version="1.0"
//!       xmlns:bookmark="http://www.freedesktop.org/standards/desktop-bookmarks">
//!   <bookmark href="https://example.com/" added="2024-05-01T10:00:00.000000Z"
//!             modified="2024-05-01T10:00:00.000000Z"
//!             visited="2024-05-01T10:00:00.000000Z">
//!     <info>...</info>
//!   </bookmark>
//! </xbel>
//! ```

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::Value;
use tracing::warn;

use crate::domain::LinkEvent;

/// One `<bookmark>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bookmark {
    pub href: String,
    pub added: Option<String>,
    pub modified: Option<String>,
    pub visited: Option<String>,
}

impl Bookmark {
    /// When the entry was last opened: `visited`, else `added`.
    pub fn last_seen(&self) -> Option<&str> {
        self.visited
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(self.added.as_deref())
    }

    /// Identifier distinguishing two visits of the same URL.
    pub fn entry_id(&self) -> String {
        format!("{}|{}", self.href, self.last_seen().unwrap_or_default())
    }

    /// Builds the event for this entry with its provenance as metadata.
    pub fn into_event(self, source: &str) -> LinkEvent {
        let visited = self.last_seen().map(str::to_string);
        let as_value = |v: Option<String>| v.map(Value::String).unwrap_or(Value::Null);

        let mut metadata = HashMap::new();
        metadata.insert("added".to_string(), as_value(self.added));
        metadata.insert("modified".to_string(), as_value(self.modified));
        metadata.insert("visited".to_string(), as_value(visited));

        LinkEvent::new(self.href, source).with_metadata(metadata)
    }
}

/// Extracts every bookmark carrying an `href`, in document order.
///
/// A bookmark whose attributes cannot be decoded (bad escape, duplicate
/// attribute) is skipped with a warning; the rest of the file is kept.
///
/// # Errors
///
/// Returns the parser error for malformed documents. Nothing is returned
/// for a partially parsed file.
pub fn parse_bookmarks(xml: &str) -> Result<Vec<Bookmark>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut bookmarks = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                if element.local_name().as_ref() != b"bookmark" {
                    continue;
                }
                match read_bookmark(&element) {
                    Ok(Some(bookmark)) => bookmarks.push(bookmark),
                    Ok(None) => {}
                    Err(e) => warn!(
                        position = reader.buffer_position(),
                        "Skipping undecodable bookmark: {}", e
                    ),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(bookmarks)
}

fn read_bookmark(element: &BytesStart<'_>) -> Result<Option<Bookmark>, quick_xml::Error> {
    let mut bookmark = Bookmark::default();
    let mut has_href = false;

    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"href" => {
                bookmark.href = value;
                has_href = true;
            }
            b"added" => bookmark.added = Some(value),
            b"modified" => bookmark.modified = Some(value),
            b"visited" => bookmark.visited = Some(value),
            _ => {}
        }
    }

    Ok(has_href.then_some(bookmark))
}

//! JSON bookmark files
//!
//! Import accepts a top-level array of bookmark objects, or the envelope
//! written by export (`{"version": 1, "bookmarks": [...]}`). Field names
//! follow the service: `url`, `title`, `description`, `notes`, `tag_names`,
//! `unread`, `shared`, `is_archived`. Unknown fields are ignored.

use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{non_empty, Format, ParseOutput};
use crate::error::{ExchangeError, ExchangeResult};
use crate::models::{BookmarkRecord, RemoteBookmark};

/// Version marker written into exports
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    bookmarks: &'a [RemoteBookmark],
}

/// One array element; everything optional so a missing URL is reported, not rejected by serde
#[derive(Deserialize)]
struct JsonBookmark {
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    notes: Option<String>,
    tag_names: Option<Vec<String>>,
    unread: Option<bool>,
    shared: Option<bool>,
    is_archived: Option<bool>,
}

/// Parse a JSON bookmark file
///
/// The 1-based array index is used as the record's source line.
pub fn parse(input: &str) -> ExchangeResult<ParseOutput> {
    let document: Value = serde_json::from_str(input)
        .map_err(|e| ExchangeError::invalid(Format::Json, e.to_string()))?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("bookmarks") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ExchangeError::invalid(
                    Format::Json,
                    "expected an array of bookmarks or an object with a \"bookmarks\" array",
                ))
            }
        },
        _ => {
            return Err(ExchangeError::invalid(
                Format::Json,
                "expected an array of bookmarks",
            ))
        }
    };

    let mut output = ParseOutput::default();
    for (index, item) in items.into_iter().enumerate() {
        let line = index + 1;
        let bookmark: JsonBookmark = match serde_json::from_value(item) {
            Ok(bookmark) => bookmark,
            Err(e) => {
                output.push_error(line, format!("Invalid bookmark: {}", e));
                continue;
            }
        };

        let url = bookmark.url.as_deref().map(str::trim).unwrap_or("");
        if url.is_empty() {
            output.push_error(line, "Missing url");
            continue;
        }

        let mut record = BookmarkRecord::new(url, line);
        record.title = bookmark.title.and_then(non_empty);
        record.description = bookmark.description.and_then(non_empty);
        record.notes = bookmark.notes.and_then(non_empty);
        for tag in bookmark.tag_names.unwrap_or_default() {
            record.add_tag(tag.trim());
        }
        record.unread = bookmark.unread.unwrap_or(false);
        record.shared = bookmark.shared.unwrap_or(false);
        record.archived = bookmark.is_archived.unwrap_or(false);
        output.push_record(record);
    }

    debug!(
        "Parsed JSON: {} records, {} errors",
        output.records.len(),
        output.errors.len()
    );
    Ok(output)
}

/// Write bookmarks as a versioned JSON document, every field present
pub fn write<W: Write>(bookmarks: &[RemoteBookmark], out: &mut W) -> ExchangeResult<()> {
    let envelope = Envelope {
        version: FORMAT_VERSION,
        bookmarks,
    };
    serde_json::to_writer_pretty(&mut *out, &envelope)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::fixtures::remote;

    #[test]
    fn test_parse_array() {
        let input = r#"[
            {"url": "https://example.com", "title": "Example", "tag_names": ["a", "b"],
             "unread": true, "shared": true, "is_archived": true, "notes": "n"},
            {"url": "https://rust-lang.org"}
        ]"#;

        let output = parse(input).unwrap();
        assert!(output.errors.is_empty());
        assert_eq!(output.records.len(), 2);

        let first = &output.records[0];
        assert_eq!(first.url, "https://example.com");
        assert_eq!(first.title.as_deref(), Some("Example"));
        assert_eq!(first.notes.as_deref(), Some("n"));
        assert_eq!(first.tag_names, vec!["a", "b"]);
        assert!(first.unread && first.shared && first.archived);
        assert_eq!(first.source_line, 1);

        let second = &output.records[1];
        assert!(second.title.is_none());
        assert!(!second.unread);
        assert_eq!(second.source_line, 2);
    }

    #[test]
    fn test_missing_url_is_record_error() {
        let input = r#"[
            {"url": "https://one.example"},
            {"title": "no url here"},
            {"url": "https://three.example"}
        ]"#;

        let output = parse(input).unwrap();
        let urls: Vec<&str> = output.records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://one.example", "https://three.example"]);
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].line, 2);
        assert!(output.errors[0].message.contains("url"));
    }

    #[test]
    fn test_empty_url_and_wrong_types_are_record_errors() {
        let input =
            r#"[{"url": "  "}, "just a string", {"url": "https://x.test", "unread": "yes"}]"#;
        let output = parse(input).unwrap();
        assert!(output.records.is_empty());
        let lines: Vec<usize> = output.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_document_is_fatal() {
        assert!(matches!(
            parse("{not json"),
            Err(ExchangeError::InvalidDocument {
                format: Format::Json,
                ..
            })
        ));
        assert!(parse(r#"{"items": []}"#).is_err());
        assert!(parse("42").is_err());
    }

    #[test]
    fn test_export_envelope_reimports() {
        let mut bookmark = remote(1, "https://example.com", "A & B", &["x", "y"]);
        bookmark.description = "desc".to_string();
        bookmark.is_archived = true;
        let bookmarks = vec![bookmark, remote(2, "https://two.example", "", &[])];

        let mut out = Vec::new();
        write(&bookmarks, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        // Empty strings are kept, not omitted
        assert_eq!(value["bookmarks"][1]["title"], "");
        assert_eq!(value["bookmarks"][1]["tag_names"], serde_json::json!([]));

        let output = parse(&text).unwrap();
        assert!(output.errors.is_empty());
        assert_eq!(output.records.len(), 2);
        assert_eq!(output.records[0].title.as_deref(), Some("A & B"));
        assert_eq!(output.records[0].description.as_deref(), Some("desc"));
        assert!(output.records[0].archived);
        assert_eq!(output.records[0].tag_names, vec!["x", "y"]);
        assert!(output.records[1].title.is_none());
    }
}

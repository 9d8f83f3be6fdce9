//! Netscape bookmark files
//!
//! The parser scans for `<A ...>title</A>` anchors, flattening any folder
//! hierarchy (`<H3>`/`<DL>`), and picks up a directly following `<DD>` as
//! the description. Each anchor is decoded with `scraper` so attribute
//! values and text come back with HTML entities resolved.
//!
//! Recognised anchor attributes: `HREF`, `TAGS` (comma-separated),
//! `TOREAD="1"` (unread), `PRIVATE="0"` (shared).

use std::io::Write;

use scraper::{Html, Selector};
use tracing::debug;

use super::{split_tags, ParseOutput};
use crate::error::ExchangeResult;
use crate::models::{BookmarkRecord, RemoteBookmark};

const HEADER: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>"#;

const FOOTER: &str = "</DL><p>";

/// Fields decoded from one anchor element
#[derive(Debug, Default)]
struct Anchor {
    href: Option<String>,
    title: String,
    tags: Vec<String>,
    unread: bool,
    shared: bool,
}

/// Parse a Netscape bookmark file
///
/// The line on which an anchor starts is used as its source line.
pub fn parse(input: &str) -> ParseOutput {
    // ASCII lowercasing keeps byte offsets aligned with `input`
    let lower = input.to_ascii_lowercase();
    let mut output = ParseOutput::default();

    let mut pos = 0;
    let mut line = 1;
    let mut counted = 0;

    while let Some(start) = find_anchor(&lower, pos) {
        line += input[counted..start].matches('\n').count();
        counted = start;

        let Some(close) = lower[start..].find("</a>") else {
            output.push_error(line, "Unterminated <A> element");
            break;
        };
        let end = start + close + "</a>".len();

        let (description, next) = read_description(input, &lower, end);
        pos = next;

        let Some(anchor) = decode_anchor(&input[start..end]) else {
            output.push_error(line, "Malformed <A> element");
            continue;
        };

        let url = anchor.href.as_deref().map(str::trim).unwrap_or("");
        if url.is_empty() {
            output.push_error(line, "Bookmark anchor has no HREF");
            continue;
        }

        let mut record = BookmarkRecord::new(url, line);
        if !anchor.title.trim().is_empty() {
            record.title = Some(anchor.title);
        }
        record.description = description;
        for tag in anchor.tags {
            record.add_tag(tag);
        }
        record.unread = anchor.unread;
        record.shared = anchor.shared;
        output.push_record(record);
    }

    debug!(
        "Parsed HTML: {} records, {} errors",
        output.records.len(),
        output.errors.len()
    );
    output
}

/// Find the next `<a` start tag at or after `from`
fn find_anchor(lower: &str, from: usize) -> Option<usize> {
    let mut from = from;
    while let Some(offset) = lower.get(from..)?.find("<a") {
        let start = from + offset;
        match lower.as_bytes().get(start + 2) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' => return Some(start),
            _ => from = start + 2,
        }
    }
    None
}

/// Read a `<DD>` that directly follows an anchor
///
/// Returns the decoded description and the position to continue scanning from.
/// Text is kept as written apart from trailing layout whitespace that runs
/// onto the next line.
fn read_description(input: &str, lower: &str, from: usize) -> (Option<String>, usize) {
    let rest = &lower[from..];
    let skipped = rest.len() - rest.trim_start().len();
    let dd = from + skipped;
    if !lower[dd..].starts_with("<dd>") {
        return (None, from);
    }

    let text_start = dd + "<dd>".len();
    let text_end = lower[text_start..]
        .find('<')
        .map_or(input.len(), |i| text_start + i);
    let raw = &input[text_start..text_end];
    let content = raw.trim_end();
    let raw = if raw[content.len()..].contains('\n') {
        content
    } else {
        raw
    };
    let text = decode_text(raw);
    let description = if text.trim().is_empty() {
        None
    } else {
        Some(text)
    };
    (description, text_end)
}

/// Decode one `<A ...>...</A>` fragment
fn decode_anchor(fragment: &str) -> Option<Anchor> {
    let document = Html::parse_fragment(fragment);
    let selector = Selector::parse("a").ok()?;
    let element = document.select(&selector).next()?;
    let attrs = element.value();

    Some(Anchor {
        href: attrs.attr("href").map(str::to_string),
        title: element.text().collect(),
        tags: attrs
            .attr("tags")
            .map(|tags| split_tags(tags, ','))
            .unwrap_or_default(),
        unread: attrs.attr("toread").map(str::trim) == Some("1"),
        shared: attrs.attr("private").map(str::trim) == Some("0"),
    })
}

/// Resolve entities in a run of text
fn decode_text(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    Html::parse_fragment(raw)
        .root_element()
        .text()
        .collect()
}

/// Escape text for use in element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Write bookmarks as a Netscape bookmark file
pub fn write<W: Write>(bookmarks: &[RemoteBookmark], out: &mut W) -> ExchangeResult<()> {
    writeln!(out, "{}", HEADER)?;

    for bookmark in bookmarks {
        let tags = bookmark
            .tag_names
            .iter()
            .map(|t| escape(t))
            .collect::<Vec<_>>()
            .join(",");
        let toread = if bookmark.unread { " TOREAD=\"1\"" } else { "" };

        write!(
            out,
            "    <DT><A HREF=\"{}\" ADD_DATE=\"{}\" LAST_MODIFIED=\"{}\"",
            escape(&bookmark.url),
            bookmark.date_added.timestamp(),
            bookmark.date_modified.timestamp(),
        )?;
        writeln!(
            out,
            " PRIVATE=\"{}\"{} TAGS=\"{}\">{}</A>",
            if bookmark.shared { 0 } else { 1 },
            toread,
            tags,
            escape(&bookmark.title)
        )?;
        if !bookmark.description.is_empty() {
            writeln!(out, "    <DD>{}</DD>", escape(&bookmark.description))?;
        }
    }

    writeln!(out, "{}", FOOTER)?;
    Ok(())
}

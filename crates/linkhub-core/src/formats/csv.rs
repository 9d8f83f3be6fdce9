//! CSV bookmark files
//!
//! The first row is a header. `url` is required; `title`, `description`,
//! `notes`, `tags`, `unread`, `shared` and `archived` are optional and
//! default to empty/false. Multiple tags share one cell joined by `;`; a
//! literal `;` or `\` inside a tag name is written as `\;` or `\\`.
//!
//! Fields follow RFC 4180 quoting: a quoted field may contain commas,
//! newlines and doubled quotes. Rows are numbered from 1 after the header;
//! a row spanning several physical lines still counts once.

use std::io::Write;

use tracing::debug;

use super::{non_empty, Format, ParseOutput};
use crate::error::{ExchangeError, ExchangeResult};
use crate::models::{BookmarkRecord, RemoteBookmark};

/// Delimiter between tags inside the tags cell
pub const TAG_DELIMITER: char = ';';

const FIELD_DELIMITER: char = ',';

const HEADER: [&str; 8] = [
    "url",
    "title",
    "description",
    "tags",
    "notes",
    "unread",
    "shared",
    "archived",
];

/// One row as split from the input
#[derive(Debug, PartialEq)]
struct RawRow {
    fields: Vec<String>,
    /// The input ended inside a quoted field
    unterminated: bool,
}

/// Column positions resolved from the header row
#[derive(Debug)]
struct Columns {
    width: usize,
    url: usize,
    title: Option<usize>,
    description: Option<usize>,
    notes: Option<usize>,
    tags: Option<usize>,
    unread: Option<usize>,
    shared: Option<usize>,
    archived: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> ExchangeResult<Self> {
        let names: Vec<String> = header
            .iter()
            .map(|name| name.trim().to_ascii_lowercase())
            .collect();
        let find = |candidates: &[&str]| position(&names, candidates);

        let url = find(&["url"][..])
            .ok_or_else(|| ExchangeError::invalid(Format::Csv, "header has no `url` column"))?;

        Ok(Self {
            width: names.len(),
            url,
            title: find(&["title"][..]),
            description: find(&["description"][..]),
            notes: find(&["notes"][..]),
            tags: find(&["tags", "tag_names"][..]),
            unread: find(&["unread"][..]),
            shared: find(&["shared"][..]),
            archived: find(&["archived", "is_archived"][..]),
        })
    }

    fn record(&self, fields: &[String], row: usize) -> Result<BookmarkRecord, String> {
        let url = fields[self.url].trim();
        if url.is_empty() {
            return Err("Missing url".to_string());
        }

        let text = |column: Option<usize>| column.and_then(|i| non_empty(fields[i].clone()));
        let flag = |column: Option<usize>, name: &str| match column {
            Some(i) => parse_bool(&fields[i])
                .ok_or_else(|| format!("Invalid boolean in column '{}': {:?}", name, fields[i])),
            None => Ok(false),
        };

        let mut record = BookmarkRecord::new(url, row);
        record.title = text(self.title);
        record.description = text(self.description);
        record.notes = text(self.notes);
        if let Some(i) = self.tags {
            for tag in split_cell_tags(&fields[i]) {
                record.add_tag(tag);
            }
        }
        record.unread = flag(self.unread, "unread")?;
        record.shared = flag(self.shared, "shared")?;
        record.archived = flag(self.archived, "archived")?;
        Ok(record)
    }
}

fn position(names: &[String], candidates: &[&str]) -> Option<usize> {
    names
        .iter()
        .position(|name| candidates.contains(&name.as_str()))
}

/// Split a tags cell on unescaped `;`, trimming and dropping empty and
/// repeated names
///
/// `\;` and `\\` stand for a literal `;` and `\`; any other backslash is kept.
fn split_cell_tags(value: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut push = |tag: &mut String| {
        let name = tag.trim();
        if !name.is_empty() && !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
        tag.clear();
    };

    let mut current = String::new();
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some(&next) if next == TAG_DELIMITER || next == '\\' => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push(c),
            },
            TAG_DELIMITER => push(&mut current),
            _ => current.push(c),
        }
    }
    push(&mut current);
    tags
}

/// Escape a tag name for the tags cell
fn escape_tag(tag: &str) -> String {
    tag.replace('\\', "\\\\").replace(TAG_DELIMITER, "\\;")
}

/// Parse a boolean cell; an empty cell is `false`
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Some(false),
        "true" | "1" | "yes" => Some(true),
        _ => None,
    }
}

/// Split input into rows of fields
///
/// A quote only opens a quoted field as the first character of that field;
/// anywhere else it is literal text.
fn split_rows(input: &str) -> Vec<RawRow> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut row_started = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
                row_started = true;
            }
            FIELD_DELIMITER => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
                row_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut field));
                rows.push(RawRow {
                    fields: std::mem::take(&mut fields),
                    unterminated: false,
                });
                at_field_start = true;
                row_started = false;
            }
            _ => {
                field.push(c);
                at_field_start = false;
                row_started = true;
            }
        }
    }

    if row_started || in_quotes {
        fields.push(field);
        rows.push(RawRow {
            fields,
            unterminated: in_quotes,
        });
    }
    rows
}

/// Parse a CSV bookmark file
pub fn parse(input: &str) -> ExchangeResult<ParseOutput> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut rows = split_rows(input).into_iter();

    let header = rows
        .next()
        .ok_or_else(|| ExchangeError::invalid(Format::Csv, "file is empty"))?;
    let columns = Columns::from_header(&header.fields)?;

    let mut output = ParseOutput::default();
    for (index, row) in rows.enumerate() {
        let row_number = index + 1;

        if row.unterminated {
            output.push_error(row_number, "Unterminated quoted field");
            continue;
        }
        if row.fields.len() == 1 && row.fields[0].trim().is_empty() {
            continue;
        }
        if row.fields.len() < columns.width {
            output.push_error(
                row_number,
                format!(
                    "Expected {} columns, found {}",
                    columns.width,
                    row.fields.len()
                ),
            );
            continue;
        }

        match columns.record(&row.fields, row_number) {
            Ok(record) => output.push_record(record),
            Err(message) => output.push_error(row_number, message),
        }
    }

    debug!(
        "Parsed CSV: {} records, {} errors",
        output.records.len(),
        output.errors.len()
    );
    Ok(output)
}

/// Quote a field if it contains a delimiter, quote or line break
fn escape_field(field: &str) -> String {
    let needs_quotes = field.contains(FIELD_DELIMITER)
        || field.contains(TAG_DELIMITER)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');

    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write bookmarks as CSV with a header row
pub fn write<W: Write>(bookmarks: &[RemoteBookmark], out: &mut W) -> ExchangeResult<()> {
    writeln!(out, "{}", HEADER.join(","))?;

    for bookmark in bookmarks {
        let tags: Vec<String> = bookmark.tag_names.iter().map(|t| escape_tag(t)).collect();
        let tags = tags.join(&TAG_DELIMITER.to_string());
        let row = [
            escape_field(&bookmark.url),
            escape_field(&bookmark.title),
            escape_field(&bookmark.description),
            escape_field(&tags),
            escape_field(&bookmark.notes),
            bookmark.unread.to_string(),
            bookmark.shared.to_string(),
            bookmark.is_archived.to_string(),
        ];
        writeln!(out, "{}", row.join(","))?;
    }
    Ok(())
}

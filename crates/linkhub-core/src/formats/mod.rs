//! Bookmark file formats
//!
//! Each format has a parser producing [`BookmarkRecord`]s plus per-record
//! errors, and a serializer writing remote bookmarks. Parsers never touch
//! the network.
//!
//! - `json`: array of objects (or the export envelope)
//! - `html`: Netscape bookmark file
//! - `csv`: header row plus one row per bookmark, tags joined by `;`

pub mod csv;
pub mod html;
pub mod json;

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ExchangeError, ExchangeResult};
use crate::models::{BookmarkRecord, RemoteBookmark};
use crate::report::ImportError;

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Html,
    Csv,
}

impl Format {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "html" | "htm" => Some(Format::Html),
            "csv" => Some(Format::Csv),
            _ => None,
        }
    }

    /// Use the explicit format if given, otherwise detect it from the path
    pub fn resolve(explicit: Option<Format>, path: &Path) -> ExchangeResult<Self> {
        match explicit {
            Some(format) => Ok(format),
            None => Self::from_path(path).ok_or_else(|| ExchangeError::FormatRequired {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Html => "html",
            Format::Csv => "csv",
        }
    }

    /// Parse file content in this format
    pub fn parse(&self, input: &str) -> ExchangeResult<ParseOutput> {
        match self {
            Format::Json => json::parse(input),
            Format::Html => Ok(html::parse(input)),
            Format::Csv => csv::parse(input),
        }
    }

    /// Write bookmarks in this format
    pub fn write<W: Write>(&self, bookmarks: &[RemoteBookmark], out: &mut W) -> ExchangeResult<()> {
        match self {
            Format::Json => json::write(bookmarks, out),
            Format::Html => html::write(bookmarks, out),
            Format::Csv => csv::write(bookmarks, out),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Json => "JSON",
            Format::Html => "HTML",
            Format::Csv => "CSV",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Format {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "html" | "htm" | "netscape" => Ok(Format::Html),
            "csv" => Ok(Format::Csv),
            other => Err(ExchangeError::UnknownFormat(other.to_string())),
        }
    }
}

/// Records and per-record errors from one parsed file
///
/// Both lists are in source order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParseOutput {
    pub records: Vec<BookmarkRecord>,
    pub errors: Vec<ImportError>,
}

impl ParseOutput {
    pub(crate) fn push_record(&mut self, record: BookmarkRecord) {
        self.records.push(record);
    }

    pub(crate) fn push_error(&mut self, line: usize, message: impl Into<String>) {
        self.errors.push(ImportError::new(line, message));
    }
}

/// Split a delimited tag list, trimming and dropping empty and repeated names
pub(crate) fn split_tags(value: &str, delimiter: char) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in value.split(delimiter).map(str::trim) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Map an empty string to `None`
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

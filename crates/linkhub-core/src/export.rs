//! Bookmark export
//!
//! Fetches the remote bookmark set once through the aggregator and writes it
//! in the requested format.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::api::{ApiResult, BookmarkApi, BookmarkFilter};
use crate::error::ExchangeResult;
use crate::formats::Format;
use crate::models::RemoteBookmark;
use crate::paginate;

/// Options for one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Only bookmarks carrying this tag
    pub tag: Option<String>,
    /// Include archived bookmarks after the active ones
    pub include_archived: bool,
}

impl ExportOptions {
    fn filter(&self, archived: bool) -> BookmarkFilter {
        let filter = if archived {
            BookmarkFilter::archived()
        } else {
            BookmarkFilter::active()
        };
        match self.tag {
            Some(ref tag) => filter.with_tag(tag),
            None => filter,
        }
    }
}

/// Fetch every bookmark selected by the options, in fetch order
pub fn collect<A: BookmarkApi + ?Sized>(
    api: &A,
    options: &ExportOptions,
) -> ApiResult<Vec<RemoteBookmark>> {
    let mut bookmarks = paginate::all_bookmarks(api, &options.filter(false))?;
    if options.include_archived {
        bookmarks.extend(paginate::all_bookmarks(api, &options.filter(true))?);
    }
    Ok(bookmarks)
}

/// Export bookmarks to a writer, returning how many were written
pub fn export<A: BookmarkApi + ?Sized, W: Write>(
    api: &A,
    format: Format,
    options: &ExportOptions,
    out: &mut W,
) -> ExchangeResult<usize> {
    let bookmarks = collect(api, options)?;
    format.write(&bookmarks, out)?;
    out.flush()?;
    info!("Exported {} bookmarks as {}", bookmarks.len(), format);
    Ok(bookmarks.len())
}

/// Export bookmarks to a file
///
/// The format is detected from the extension unless given. The file is only
/// created once the bookmarks have been fetched.
pub fn export_to_file<A: BookmarkApi + ?Sized>(
    api: &A,
    path: &Path,
    format: Option<Format>,
    options: &ExportOptions,
) -> ExchangeResult<usize> {
    let format = Format::resolve(format, path)?;
    let bookmarks = collect(api, options)?;

    let mut out = BufWriter::new(File::create(path)?);
    format.write(&bookmarks, &mut out)?;
    out.flush()?;

    info!(
        "Exported {} bookmarks to {} as {}",
        bookmarks.len(),
        path.display(),
        format
    );
    Ok(bookmarks.len())
}

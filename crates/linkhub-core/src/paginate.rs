//! Pagination aggregator
//!
//! Walks an offset/limit listing until the server reports no further pages.
//! The walk is not a transactional snapshot: items added or removed on the
//! server while it runs may be missed or seen twice.

use tracing::{debug, warn};

use crate::api::{ApiError, ApiResult, BookmarkApi, BookmarkFilter};
use crate::models::{Page, RemoteBookmark, Tag};

/// Items requested per page
pub const PAGE_SIZE: usize = 100;

/// Collect every item of a paginated listing, in page order
///
/// `fetch` is called with `(offset, limit)`. The walk stops on the first page
/// with `has_next == false`; the first failing fetch aborts the walk and its
/// error is returned without any partial result. An empty page that still
/// claims more items is an [`ApiError::Decode`] error.
pub fn fetch_all<T, F>(page_size: usize, mut fetch: F) -> ApiResult<Vec<T>>
where
    F: FnMut(usize, usize) -> ApiResult<Page<T>>,
{
    let page_size = page_size.max(1);
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch(offset, page_size)?;
        debug!(
            "Fetched page at offset {} ({} items, {} total)",
            offset,
            page.items.len(),
            page.count
        );

        if items.is_empty() {
            items.reserve(page.count);
        }
        let received = page.items.len();
        items.extend(page.items);

        if !page.has_next {
            break;
        }
        if received == 0 {
            warn!("Empty page at offset {} still reports more items", offset);
            return Err(ApiError::Decode {
                details: format!(
                    "empty page at offset {} of {} still reports more items",
                    offset, page.count
                ),
            });
        }
        offset += received;
    }

    Ok(items)
}

/// Fetch every bookmark matching a filter
pub fn all_bookmarks<A: BookmarkApi + ?Sized>(
    api: &A,
    filter: &BookmarkFilter,
) -> ApiResult<Vec<RemoteBookmark>> {
    fetch_all(PAGE_SIZE, |offset, limit| {
        api.fetch_bookmark_page(filter, offset, limit)
    })
}

/// Fetch every bookmark, active and archived, optionally restricted by query
pub fn all_bookmarks_with_archived<A: BookmarkApi + ?Sized>(
    api: &A,
    query: Option<&str>,
) -> ApiResult<Vec<RemoteBookmark>> {
    let mut active = BookmarkFilter::active();
    active.query = query.map(str::to_string);
    let mut archived = BookmarkFilter::archived();
    archived.query = query.map(str::to_string);

    let mut bookmarks = all_bookmarks(api, &active)?;
    bookmarks.extend(all_bookmarks(api, &archived)?);
    Ok(bookmarks)
}

/// Fetch every tag
pub fn all_tags<A: BookmarkApi + ?Sized>(api: &A) -> ApiResult<Vec<Tag>> {
    fetch_all(PAGE_SIZE, |offset, limit| api.fetch_tag_page(offset, limit))
}

//! Bookmark service API
//!
//! The import/export engine only depends on the [`BookmarkApi`] capability
//! trait. [`HttpClient`] implements it against the REST service and adds the
//! remaining CRUD calls used by the CLI.

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::{ApiError, ApiResult};

use crate::models::{BookmarkDraft, Page, RemoteBookmark, Tag};

/// Filter passed unchanged to every page request of a bookmark listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkFilter {
    /// Search query (`#tag` selects a tag)
    pub query: Option<String>,
    /// List archived bookmarks instead of active ones
    pub archived: bool,
}

impl BookmarkFilter {
    /// Active bookmarks, no query
    pub fn active() -> Self {
        Self::default()
    }

    /// Archived bookmarks, no query
    pub fn archived() -> Self {
        Self {
            query: None,
            archived: true,
        }
    }

    /// Restrict the listing to bookmarks carrying a tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.query = Some(format!("#{}", tag));
        self
    }

    /// Restrict the listing to a free-text search
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// Operations the import/export engine needs from the service
pub trait BookmarkApi {
    /// Fetch one page of bookmarks
    fn fetch_bookmark_page(
        &self,
        filter: &BookmarkFilter,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Page<RemoteBookmark>>;

    /// Fetch one page of tags
    fn fetch_tag_page(&self, offset: usize, limit: usize) -> ApiResult<Page<Tag>>;

    /// Create a bookmark
    fn create_bookmark(&self, draft: &BookmarkDraft) -> ApiResult<RemoteBookmark>;

    /// Replace every writable field of an existing bookmark
    fn update_bookmark(&self, id: u64, draft: &BookmarkDraft) -> ApiResult<RemoteBookmark>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_builders() {
        assert_eq!(BookmarkFilter::active(), BookmarkFilter::default());
        assert!(BookmarkFilter::archived().archived);

        let filter = BookmarkFilter::active().with_tag("rust");
        assert_eq!(filter.query.as_deref(), Some("#rust"));
        assert!(!filter.archived);

        let filter = BookmarkFilter::archived().with_query("async io");
        assert_eq!(filter.query.as_deref(), Some("async io"));
        assert!(filter.archived);
    }
}

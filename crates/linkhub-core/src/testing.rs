//! In-memory bookmark service for tests

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use chrono::{TimeZone, Utc};

use crate::api::{ApiError, ApiResult, BookmarkApi, BookmarkFilter};
use crate::models::{BookmarkDraft, Page, RemoteBookmark, Tag};

/// A mutating call received by the fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(String),
    Update(u64, String),
}

#[derive(Default)]
pub struct FakeApi {
    pub bookmarks: RefCell<Vec<RemoteBookmark>>,
    pub tags: RefCell<Vec<Tag>>,
    pub calls: RefCell<Vec<Call>>,
    pub page_fetches: Cell<usize>,
    /// Mutations on these URLs fail with a 400
    pub failing_urls: RefCell<HashSet<String>>,
    /// Every page fetch fails with a transport-like status error
    pub fail_fetch: Cell<bool>,
    next_id: Cell<u64>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Self::default()
        }
    }

    /// Add a bookmark directly to the remote state
    pub fn seed(&self, url: &str, tags: &[&str]) -> u64 {
        let mut draft = BookmarkDraft::new(url);
        draft.tag_names = tags.iter().map(|t| t.to_string()).collect();
        self.insert(&draft).id
    }

    pub fn seed_tag(&self, name: &str) {
        let mut tags = self.tags.borrow_mut();
        let id = tags.len() as u64 + 1;
        tags.push(Tag {
            id,
            name: name.to_string(),
            date_added: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        });
    }

    pub fn fail_on(&self, url: &str) {
        self.failing_urls.borrow_mut().insert(url.to_string());
    }

    pub fn mutation_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn insert(&self, draft: &BookmarkDraft) -> RemoteBookmark {
        let id = self.next_id.get().max(1);
        self.next_id.set(id + 1);
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bookmark = RemoteBookmark {
            id,
            url: draft.url.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            notes: draft.notes.clone(),
            tag_names: draft.tag_names.clone(),
            unread: draft.unread,
            shared: draft.shared,
            is_archived: draft.is_archived,
            date_added: stamp,
            date_modified: stamp,
        };
        self.bookmarks.borrow_mut().push(bookmark.clone());
        bookmark
    }

    fn check_failure(&self, url: &str) -> ApiResult<()> {
        if self.failing_urls.borrow().contains(url) {
            return Err(ApiError::status(400, "rejected by fake"));
        }
        Ok(())
    }
}

fn paginate<T: Clone>(items: &[T], offset: usize, limit: usize) -> Page<T> {
    let start = offset.min(items.len());
    let end = (offset + limit).min(items.len());
    Page {
        count: items.len(),
        items: items[start..end].to_vec(),
        has_next: end < items.len(),
    }
}

impl BookmarkApi for FakeApi {
    fn fetch_bookmark_page(
        &self,
        filter: &BookmarkFilter,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Page<RemoteBookmark>> {
        self.page_fetches.set(self.page_fetches.get() + 1);
        if self.fail_fetch.get() {
            return Err(ApiError::status(503, "unavailable"));
        }

        let tag = filter
            .query
            .as_deref()
            .and_then(|q| q.strip_prefix('#'));
        let matching: Vec<RemoteBookmark> = self
            .bookmarks
            .borrow()
            .iter()
            .filter(|b| b.is_archived == filter.archived)
            .filter(|b| tag.map_or(true, |t| b.has_tag(t)))
            .cloned()
            .collect();
        Ok(paginate(&matching, offset, limit))
    }

    fn fetch_tag_page(&self, offset: usize, limit: usize) -> ApiResult<Page<Tag>> {
        self.page_fetches.set(self.page_fetches.get() + 1);
        if self.fail_fetch.get() {
            return Err(ApiError::status(503, "unavailable"));
        }
        Ok(paginate(&self.tags.borrow(), offset, limit))
    }

    fn create_bookmark(&self, draft: &BookmarkDraft) -> ApiResult<RemoteBookmark> {
        self.calls.borrow_mut().push(Call::Create(draft.url.clone()));
        self.check_failure(&draft.url)?;
        Ok(self.insert(draft))
    }

    fn update_bookmark(&self, id: u64, draft: &BookmarkDraft) -> ApiResult<RemoteBookmark> {
        self.calls
            .borrow_mut()
            .push(Call::Update(id, draft.url.clone()));
        self.check_failure(&draft.url)?;

        let mut bookmarks = self.bookmarks.borrow_mut();
        let bookmark = bookmarks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ApiError::status(404, "not found"))?;
        bookmark.url = draft.url.clone();
        bookmark.title = draft.title.clone();
        bookmark.description = draft.description.clone();
        bookmark.notes = draft.notes.clone();
        bookmark.tag_names = draft.tag_names.clone();
        bookmark.unread = draft.unread;
        bookmark.shared = draft.shared;
        bookmark.is_archived = draft.is_archived;
        Ok(bookmark.clone())
    }
}

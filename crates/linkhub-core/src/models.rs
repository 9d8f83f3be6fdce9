//! Data models for linkhub
//!
//! Defines the core data structures: parsed records, remote bookmarks,
//! request drafts, tags and API pages.
//! `RemoteBookmark` and `Tag` mirror the service's wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookmark parsed from an import file, before reconciliation
///
/// Format-agnostic: every parser produces this shape. The URL is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkRecord {
    /// The URL (dedup key)
    pub url: String,
    /// Display title
    pub title: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Tags, first-seen order, no duplicates
    pub tag_names: Vec<String>,
    /// Marked as unread
    pub unread: bool,
    /// Shared with other users of the service
    pub shared: bool,
    /// Archived
    pub archived: bool,
    /// 1-based position of the record in its source file
    pub source_line: usize,
}

impl BookmarkRecord {
    /// Create a record with the given URL and source position
    pub fn new(url: impl Into<String>, source_line: usize) -> Self {
        Self {
            url: url.into(),
            title: None,
            description: None,
            notes: None,
            tag_names: Vec::new(),
            unread: false,
            shared: false,
            archived: false,
            source_line,
        }
    }

    /// Add a tag, keeping first-seen order and dropping duplicates
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !tag.is_empty() && !self.tag_names.contains(&tag) {
            self.tag_names.push(tag);
        }
    }

    /// Build the request body sent to the service for this record
    pub fn to_draft(&self) -> BookmarkDraft {
        BookmarkDraft {
            url: self.url.clone(),
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            notes: self.notes.clone().unwrap_or_default(),
            tag_names: self.tag_names.clone(),
            unread: self.unread,
            shared: self.shared,
            is_archived: self.archived,
        }
    }
}

/// A bookmark owned by the remote service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteBookmark {
    /// Server-assigned identifier
    pub id: u64,
    /// The URL
    pub url: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Notes
    #[serde(default)]
    pub notes: String,
    /// Tags
    #[serde(default)]
    pub tag_names: Vec<String>,
    /// Marked as unread
    #[serde(default)]
    pub unread: bool,
    /// Shared with other users
    #[serde(default)]
    pub shared: bool,
    /// Archived
    #[serde(default)]
    pub is_archived: bool,
    /// When the bookmark was created
    pub date_added: DateTime<Utc>,
    /// When the bookmark was last modified
    pub date_modified: DateTime<Utc>,
}

impl RemoteBookmark {
    /// Check whether the bookmark carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_names.iter().any(|t| t == tag)
    }

    /// Copy the writable fields into a draft (for read-modify-write updates)
    pub fn to_draft(&self) -> BookmarkDraft {
        BookmarkDraft {
            url: self.url.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            notes: self.notes.clone(),
            tag_names: self.tag_names.clone(),
            unread: self.unread,
            shared: self.shared,
            is_archived: self.is_archived,
        }
    }
}

/// Writable bookmark fields, sent on create and full update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BookmarkDraft {
    pub url: String,
    pub title: String,
    pub description: String,
    pub notes: String,
    pub tag_names: Vec<String>,
    pub unread: bool,
    pub shared: bool,
    pub is_archived: bool,
}

impl BookmarkDraft {
    /// Create a draft with only a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Replace one tag by another, dropping duplicates
    ///
    /// Returns true if the tag list changed.
    pub fn rename_tag(&mut self, from: &str, to: &str) -> bool {
        if !self.tag_names.iter().any(|t| t == from) {
            return false;
        }
        let mut renamed = Vec::with_capacity(self.tag_names.len());
        for tag in self.tag_names.drain(..) {
            let tag = if tag == from { to.to_string() } else { tag };
            if !renamed.contains(&tag) {
                renamed.push(tag);
            }
        }
        self.tag_names = renamed;
        true
    }

    /// Remove a tag
    ///
    /// Returns true if the tag list changed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tag_names.len();
        self.tag_names.retain(|t| t != tag);
        self.tag_names.len() != before
    }
}

/// Partial bookmark update; `None` fields are left untouched by the service
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct BookmarkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
}

impl BookmarkPatch {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A tag as known to the service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub date_added: DateTime<Utc>,
}

/// A tag name with the number of bookmarks carrying it
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// One page of a cursor-paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Total items known to the server
    pub count: usize,
    /// Items on this page
    pub items: Vec<T>,
    /// More pages remain
    pub has_next: bool,
}

//! Tag operations across bookmarks
//!
//! The service has no bulk tag endpoints, so counting, renaming and removing
//! a tag walk the bookmark listings and rewrite each affected bookmark.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::api::{ApiResult, BookmarkApi};
use crate::models::{BookmarkDraft, RemoteBookmark, TagCount};
use crate::paginate;

/// Outcome of a tag edit applied to many bookmarks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEdit {
    /// Bookmarks rewritten
    pub changed: usize,
    /// Bookmarks that could not be rewritten, by id
    pub failures: Vec<(u64, String)>,
}

impl TagEdit {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Count bookmarks per tag
///
/// Every known tag is listed, including unused ones. Tags used on bookmarks
/// but missing from the tag listing are counted too. Sorted by name.
pub fn tag_counts<A: BookmarkApi + ?Sized>(api: &A) -> ApiResult<Vec<TagCount>> {
    let mut counts: BTreeMap<String, usize> = paginate::all_tags(api)?
        .into_iter()
        .map(|tag| (tag.name, 0))
        .collect();

    for bookmark in paginate::all_bookmarks_with_archived(api, None)? {
        for tag in bookmark.tag_names {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|(name, count)| TagCount { name, count })
        .collect())
}

/// Rename a tag on every bookmark carrying it
///
/// A bookmark that already has `to` ends up with it once.
pub fn rename_tag<A: BookmarkApi + ?Sized>(
    api: &A,
    from: &str,
    to: &str,
) -> ApiResult<TagEdit> {
    info!("Renaming tag '{}' to '{}'", from, to);
    edit_tagged(api, from, |draft| draft.rename_tag(from, to))
}

/// Remove a tag from every bookmark carrying it
pub fn remove_tag<A: BookmarkApi + ?Sized>(api: &A, name: &str) -> ApiResult<TagEdit> {
    info!("Removing tag '{}'", name);
    edit_tagged(api, name, |draft| draft.remove_tag(name))
}

/// Fetch every bookmark tagged `tag` and rewrite the ones `edit` changes
fn edit_tagged<A, F>(api: &A, tag: &str, mut edit: F) -> ApiResult<TagEdit>
where
    A: BookmarkApi + ?Sized,
    F: FnMut(&mut BookmarkDraft) -> bool,
{
    let query = format!("#{}", tag);
    // Search matching may be looser than an exact tag match
    let tagged: Vec<RemoteBookmark> = paginate::all_bookmarks_with_archived(api, Some(&query))?
        .into_iter()
        .filter(|b| b.has_tag(tag))
        .collect();
    debug!("{} bookmarks carry tag '{}'", tagged.len(), tag);

    let mut result = TagEdit::default();
    for bookmark in tagged {
        let mut draft = bookmark.to_draft();
        if !edit(&mut draft) {
            continue;
        }
        match api.update_bookmark(bookmark.id, &draft) {
            Ok(_) => result.changed += 1,
            Err(e) => {
                warn!("Failed to update bookmark #{}: {}", bookmark.id, e);
                result.failures.push((bookmark.id, e.to_string()));
            }
        }
    }
    Ok(result)
}

//! Bookmark command handlers

use anyhow::{anyhow, bail, Context, Result};

use linkhub_core::paginate;
use linkhub_core::{ApiError, BookmarkApi, BookmarkDraft, BookmarkFilter, BookmarkPatch, HttpClient};

use crate::output::Output;
use crate::prompt::confirm;

/// List bookmarks, reading every page
pub fn list(
    client: &HttpClient,
    archived: bool,
    tag: Option<String>,
    query: Option<String>,
    output: &Output,
) -> Result<()> {
    let filter = build_filter(archived, tag.as_deref(), query.as_deref());
    let bookmarks =
        paginate::all_bookmarks(client, &filter).context("Failed to list bookmarks")?;
    output.print_bookmarks(&bookmarks);
    Ok(())
}

/// Combine tag and free-text filters into one search query
fn build_filter(archived: bool, tag: Option<&str>, query: Option<&str>) -> BookmarkFilter {
    let filter = if archived {
        BookmarkFilter::archived()
    } else {
        BookmarkFilter::active()
    };
    match (tag, query) {
        (Some(tag), Some(query)) => filter.with_query(format!("#{} {}", tag, query)),
        (Some(tag), None) => filter.with_tag(tag),
        (None, Some(query)) => filter.with_query(query),
        (None, None) => filter,
    }
}

/// Show a single bookmark
pub fn get(client: &HttpClient, id: u64, output: &Output) -> Result<()> {
    let bookmark = client.get_bookmark(id).map_err(|e| by_id(e, id, "get"))?;
    output.print_bookmark(&bookmark);
    Ok(())
}

/// Create a bookmark
pub fn add(client: &HttpClient, draft: BookmarkDraft, output: &Output) -> Result<()> {
    if draft.url.trim().is_empty() {
        bail!("URL must not be empty");
    }

    let bookmark = client
        .create_bookmark(&draft)
        .context("Failed to create bookmark")?;

    output.success(&format!("Created bookmark: {}", bookmark.id));
    output.print_bookmark(&bookmark);
    Ok(())
}

/// Update some fields of a bookmark
pub fn update(client: &HttpClient, id: u64, patch: BookmarkPatch, output: &Output) -> Result<()> {
    if patch.is_empty() {
        bail!(
            "Nothing to update. Pass at least one of \
             --title, --description, --notes, --tag, --unread, --shared."
        );
    }

    let bookmark = client
        .patch_bookmark(id, &patch)
        .map_err(|e| by_id(e, id, "update"))?;

    output.success("Bookmark updated");
    output.print_bookmark(&bookmark);
    Ok(())
}

/// Delete a bookmark
pub fn delete(client: &HttpClient, id: u64, yes: bool, output: &Output) -> Result<()> {
    // Confirm deletion
    if output.should_prompt() && !yes {
        let bookmark = client.get_bookmark(id).map_err(|e| by_id(e, id, "get"))?;
        println!("Delete bookmark: {} - {}", bookmark.id, bookmark.url);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    client
        .delete_bookmark(id)
        .map_err(|e| by_id(e, id, "delete"))?;

    output.success(&format!("Deleted bookmark: {}", id));
    Ok(())
}

/// Archive a bookmark
pub fn archive(client: &HttpClient, id: u64, output: &Output) -> Result<()> {
    client
        .archive_bookmark(id)
        .map_err(|e| by_id(e, id, "archive"))?;
    output.success(&format!("Archived bookmark: {}", id));
    Ok(())
}

/// Move a bookmark back out of the archive
pub fn unarchive(client: &HttpClient, id: u64, output: &Output) -> Result<()> {
    client
        .unarchive_bookmark(id)
        .map_err(|e| by_id(e, id, "unarchive"))?;
    output.success(&format!("Unarchived bookmark: {}", id));
    Ok(())
}

/// Report a missing bookmark plainly; keep other errors with their context
fn by_id(err: ApiError, id: u64, action: &str) -> anyhow::Error {
    if err.is_not_found() {
        anyhow!("Bookmark {} not found", id)
    } else {
        anyhow::Error::new(err).context(format!("Failed to {} bookmark {}", action, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        assert_eq!(build_filter(false, None, None), BookmarkFilter::active());

        let filter = build_filter(true, Some("rust"), None);
        assert!(filter.archived);
        assert_eq!(filter.query.as_deref(), Some("#rust"));

        let filter = build_filter(false, Some("rust"), Some("async"));
        assert_eq!(filter.query.as_deref(), Some("#rust async"));

        let filter = build_filter(false, None, Some("async"));
        assert_eq!(filter.query.as_deref(), Some("async"));
    }

    #[test]
    fn test_by_id_reports_missing_bookmark() {
        let err = by_id(ApiError::status(404, "Not found."), 7, "get");
        assert_eq!(err.to_string(), "Bookmark 7 not found");

        let err = by_id(ApiError::status(500, "oops"), 7, "archive");
        assert_eq!(err.to_string(), "Failed to archive bookmark 7");
        assert!(err.downcast_ref::<ApiError>().is_some());
    }
}

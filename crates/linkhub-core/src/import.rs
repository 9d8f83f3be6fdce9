//! Import reconciliation
//!
//! Decides, per parsed record, whether to create, update or skip a remote
//! bookmark. The remote set is fetched once up front (active and archived);
//! records are then processed strictly in input order. A failed write is
//! recorded against the record's source line and the run continues; nothing
//! already written is rolled back.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::api::BookmarkApi;
use crate::error::{ExchangeError, ExchangeResult};
use crate::formats::{Format, ParseOutput};
use crate::models::BookmarkRecord;
use crate::paginate;
use crate::report::{ImportError, ImportResult, Outcome};

/// Options for one import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Input format; `None` detects it from the file extension
    pub format: Option<Format>,
    /// Classify records without writing anything
    pub dry_run: bool,
    /// Leave bookmarks whose URL already exists untouched
    pub skip_duplicates: bool,
    /// Tags added to every imported record
    pub add_tags: Vec<String>,
}

/// What to do with one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    /// Update the bookmark with this id (`None` only for a dry-run create)
    Update(Option<u64>),
    Skip,
}

/// Import a bookmark file
pub fn import_file<A: BookmarkApi + ?Sized>(
    api: &A,
    path: &Path,
    options: &ImportOptions,
) -> ExchangeResult<ImportResult> {
    let format = Format::resolve(options.format, path)?;
    let content = fs::read_to_string(path).map_err(|source| ExchangeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Importing {} as {}", path.display(), format);
    import_str(api, &content, format, options)
}

/// Import file content already read into memory
pub fn import_str<A: BookmarkApi + ?Sized>(
    api: &A,
    input: &str,
    format: Format,
    options: &ImportOptions,
) -> ExchangeResult<ImportResult> {
    let parsed = format.parse(input)?;
    info!(
        "Parsed {} records ({} unreadable)",
        parsed.records.len(),
        parsed.errors.len()
    );
    reconcile(api, parsed, options)
}

/// Reconcile parsed records against the remote bookmark set
///
/// Fails only if the remote set cannot be fetched; in that case no record
/// has been touched.
pub fn reconcile<A: BookmarkApi + ?Sized>(
    api: &A,
    parsed: ParseOutput,
    options: &ImportOptions,
) -> ExchangeResult<ImportResult> {
    let remote = paginate::all_bookmarks_with_archived(api, None)?;
    debug!("Fetched {} remote bookmarks for dedup", remote.len());

    // Later entries win if the service ever repeats a URL
    let mut known: HashMap<String, Option<u64>> = remote
        .into_iter()
        .map(|bookmark| (bookmark.url, Some(bookmark.id)))
        .collect();

    let mut result = ImportResult::with_parse_errors(parsed.errors);
    for mut record in parsed.records {
        for tag in &options.add_tags {
            record.add_tag(tag.trim());
        }
        let action = classify(&record, &known, options);
        let outcome = apply(api, &record, action, options, &mut known);
        result.record(outcome);
    }

    let result = result.finish();
    info!(
        "Import finished: {} added, {} updated, {} skipped, {} failed{}",
        result.added,
        result.updated,
        result.skipped,
        result.failed,
        if options.dry_run { " (dry run)" } else { "" }
    );
    Ok(result)
}

fn classify(
    record: &BookmarkRecord,
    known: &HashMap<String, Option<u64>>,
    options: &ImportOptions,
) -> Action {
    match known.get(&record.url) {
        Some(_) if options.skip_duplicates => Action::Skip,
        Some(id) => Action::Update(*id),
        None => Action::Create,
    }
}

fn apply<A: BookmarkApi + ?Sized>(
    api: &A,
    record: &BookmarkRecord,
    action: Action,
    options: &ImportOptions,
    known: &mut HashMap<String, Option<u64>>,
) -> Outcome {
    let line = record.source_line;
    match action {
        Action::Skip => {
            debug!("Line {}: {} exists, skipped", line, record.url);
            Outcome::Skipped
        }
        Action::Create if options.dry_run => {
            known.insert(record.url.clone(), None);
            Outcome::Created
        }
        Action::Create => match api.create_bookmark(&record.to_draft()) {
            Ok(created) => {
                debug!("Line {}: created {} as #{}", line, record.url, created.id);
                known.insert(record.url.clone(), Some(created.id));
                Outcome::Created
            }
            Err(e) => failed(line, &record.url, e.to_string()),
        },
        Action::Update(_) if options.dry_run => Outcome::Updated,
        Action::Update(Some(id)) => match api.update_bookmark(id, &record.to_draft()) {
            Ok(_) => {
                debug!("Line {}: updated #{}", line, id);
                Outcome::Updated
            }
            Err(e) => failed(line, &record.url, e.to_string()),
        },
        Action::Update(None) => {
            failed(line, &record.url, "No remote id known for bookmark".to_string())
        }
    }
}

fn failed(line: usize, url: &str, message: String) -> Outcome {
    warn!("Line {}: failed to import {}: {}", line, url, message);
    Outcome::Failed(ImportError::new(line, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{export, ExportOptions};
    use crate::testing::{Call, FakeApi};
    use tempfile::TempDir;

    fn json_import(api: &FakeApi, input: &str, options: &ImportOptions) -> ImportResult {
        import_str(api, input, Format::Json, options).unwrap()
    }

    const THREE: &str = r#"[
        {"url": "https://one.example", "title": "One"},
        {"url": "https://two.example", "title": "Two"},
        {"url": "https://three.example", "title": "Three"}
    ]"#;

    #[test]
    fn test_export_then_import_into_empty_remote() {
        let source = FakeApi::new();
        for i in 0..5 {
            source.seed(&format!("https://site{}.example", i), &["t"]);
        }
        let mut exported = Vec::new();
        export(&source, Format::Json, &ExportOptions::default(), &mut exported).unwrap();

        let target = FakeApi::new();
        let result = json_import(
            &target,
            &String::from_utf8(exported).unwrap(),
            &ImportOptions::default(),
        );
        assert_eq!(result.added, 5);
        assert_eq!(result.updated, 0);
        assert_eq!(result.failed, 0);
        assert_eq!(target.bookmarks.borrow().len(), 5);
    }

    #[test]
    fn test_second_import_updates() {
        let api = FakeApi::new();
        let first = json_import(&api, THREE, &ImportOptions::default());
        assert_eq!(first.added, 3);

        let second = json_import(&api, THREE, &ImportOptions::default());
        assert_eq!(second.added, 0);
        assert_eq!(second.updated, 3);
        assert_eq!(api.bookmarks.borrow().len(), 3);
    }

    #[test]
    fn test_skip_duplicates_issues_no_write() {
        let api = FakeApi::new();
        api.seed("https://two.example", &[]);

        let input = r#"[{"url": "https://two.example", "title": "changed"}]"#;
        let options = ImportOptions {
            skip_duplicates: true,
            ..Default::default()
        };
        let result = json_import(&api, input, &options);

        assert_eq!(result.skipped, 1);
        assert_eq!(result.updated, 0);
        assert_eq!(api.mutation_count(), 0);
        assert_eq!(api.bookmarks.borrow()[0].title, "");
    }

    #[test]
    fn test_malformed_record_is_reported_by_line() {
        let api = FakeApi::new();
        let input = r#"[
            {"url": "https://one.example"},
            {"title": "missing url"},
            {"url": "https://three.example"}
        ]"#;
        let result = json_import(&api, input, &ImportOptions::default());

        assert_eq!(result.added, 2);
        assert_eq!(result.updated, 0);
        assert_eq!(result.failed, 0);
        assert_eq!(result.processed(), 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, 2);
        assert!(result.is_partial_failure());
    }

    #[test]
    fn test_dry_run_never_writes() {
        let api = FakeApi::new();
        api.seed("https://one.example", &[]);

        let options = ImportOptions {
            dry_run: true,
            ..Default::default()
        };
        let result = json_import(&api, THREE, &options);

        assert_eq!(result.added, 2);
        assert_eq!(result.updated, 1);
        assert_eq!(api.mutation_count(), 0);
        assert_eq!(api.bookmarks.borrow().len(), 1);
    }

    #[test]
    fn test_dry_run_matches_live_classification() {
        let input = r#"[
            {"url": "https://one.example"},
            {"url": "https://new.example"},
            {"url": "https://new.example"}
        ]"#;

        let dry = FakeApi::new();
        dry.seed("https://one.example", &[]);
        let dry_result = json_import(
            &dry,
            input,
            &ImportOptions {
                dry_run: true,
                ..Default::default()
            },
        );

        let live = FakeApi::new();
        live.seed("https://one.example", &[]);
        let live_result = json_import(&live, input, &ImportOptions::default());

        assert_eq!(dry_result, live_result);
        assert_eq!(live_result.added, 1);
        assert_eq!(live_result.updated, 2);
    }

    #[test]
    fn test_write_failure_does_not_stop_the_run() {
        let api = FakeApi::new();
        api.fail_on("https://two.example");

        let result = json_import(&api, THREE, &ImportOptions::default());
        assert_eq!(result.added, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, 2);
        assert!(result.errors[0].message.contains("400"));
        assert_eq!(api.mutation_count(), 3);
    }

    #[test]
    fn test_fetch_failure_aborts_before_writes() {
        let api = FakeApi::new();
        api.fail_fetch.set(true);

        let result = import_str(&api, THREE, Format::Json, &ImportOptions::default());
        assert!(matches!(result, Err(ExchangeError::Api(_))));
        assert_eq!(api.mutation_count(), 0);
    }

    #[test]
    fn test_remote_set_fetched_once() {
        let api = FakeApi::new();
        json_import(&api, THREE, &ImportOptions::default());
        // One walk over active bookmarks, one over archived
        assert_eq!(api.page_fetches.get(), 2);
    }

    #[test]
    fn test_archived_remote_counts_as_existing() {
        let api = FakeApi::new();
        let id = api.seed("https://one.example", &[]);
        api.bookmarks.borrow_mut()[0].is_archived = true;

        let input = r#"[{"url": "https://one.example"}]"#;
        let result = json_import(&api, input, &ImportOptions::default());
        assert_eq!(result.updated, 1);
        assert_eq!(
            *api.calls.borrow(),
            vec![Call::Update(id, "https://one.example".to_string())]
        );
    }

    #[test]
    fn test_add_tags_merged_in_order() {
        let api = FakeApi::new();
        let input = r#"[{"url": "https://one.example", "tag_names": ["a", "b"]}]"#;
        let options = ImportOptions {
            add_tags: vec!["imported".to_string(), "a".to_string()],
            ..Default::default()
        };
        json_import(&api, input, &options);

        assert_eq!(
            api.bookmarks.borrow()[0].tag_names,
            vec!["a", "b", "imported"]
        );
    }

    #[test]
    fn test_update_replaces_every_field() {
        let api = FakeApi::new();
        api.seed("https://one.example", &["old"]);
        {
            let mut bookmarks = api.bookmarks.borrow_mut();
            bookmarks[0].title = "Old title".to_string();
            bookmarks[0].notes = "old notes".to_string();
            bookmarks[0].unread = true;
        }

        let input = r#"[{"url": "https://one.example", "title": "New", "tag_names": ["new"]}]"#;
        json_import(&api, input, &ImportOptions::default());

        let bookmarks = api.bookmarks.borrow();
        assert_eq!(bookmarks[0].title, "New");
        assert_eq!(bookmarks[0].notes, "");
        assert_eq!(bookmarks[0].tag_names, vec!["new"]);
        assert!(!bookmarks[0].unread);
    }

    #[test]
    fn test_import_file_detects_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bookmarks.CSV");
        std::fs::write(&path, "url,tags\nhttps://one.example,a;b\n").unwrap();

        let api = FakeApi::new();
        let result = import_file(&api, &path, &ImportOptions::default()).unwrap();
        assert_eq!(result.added, 1);
        assert_eq!(api.bookmarks.borrow()[0].tag_names, vec!["a", "b"]);
    }

    #[test]
    fn test_import_file_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bookmarks.txt");
        std::fs::write(&path, "[]").unwrap();

        let api = FakeApi::new();
        let result = import_file(&api, &path, &ImportOptions::default());
        assert!(matches!(result, Err(ExchangeError::FormatRequired { .. })));
        assert_eq!(api.page_fetches.get(), 0);

        let options = ImportOptions {
            format: Some(Format::Json),
            ..Default::default()
        };
        assert!(import_file(&api, &path, &options).is_ok());
    }

    #[test]
    fn test_import_file_missing() {
        let api = FakeApi::new();
        let result = import_file(
            &api,
            Path::new("/nonexistent/bookmarks.json"),
            &ImportOptions::default(),
        );
        assert!(matches!(result, Err(ExchangeError::Read { .. })));
    }
}

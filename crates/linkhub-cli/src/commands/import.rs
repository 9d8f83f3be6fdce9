//! Import command handler

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;

use linkhub_core::{import_file, Format, HttpClient, ImportOptions};

use super::exit_status;
use crate::output::Output;

/// Resolve a `--format` value; `auto` or absent means detect from the file
pub fn parse_format(value: Option<&str>) -> Result<Option<Format>> {
    match value {
        None => Ok(None),
        Some(value) if value.trim().eq_ignore_ascii_case("auto") => Ok(None),
        Some(value) => Ok(Some(value.parse()?)),
    }
}

/// Import a bookmark file
///
/// Exits with the partial-failure code when any record was not imported.
pub fn import(
    client: &HttpClient,
    file: PathBuf,
    format: Option<String>,
    dry_run: bool,
    skip_duplicates: bool,
    add_tags: Vec<String>,
    output: &Output,
) -> Result<ExitCode> {
    let options = ImportOptions {
        format: parse_format(format.as_deref())?,
        dry_run,
        skip_duplicates,
        add_tags,
    };

    let result = import_file(client, &file, &options)?;
    output.print_import_result(&result, dry_run);
    Ok(exit_status(!result.is_partial_failure()))
}

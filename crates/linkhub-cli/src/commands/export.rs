//! Export command handler

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use linkhub_core::{export, export_to_file, ExportOptions, Format, HttpClient};

use super::import::parse_format;
use crate::output::Output;

/// Export bookmarks to a file, or to stdout when no file is given
///
/// Stdout exports default to JSON and print nothing else.
pub fn export_bookmarks(
    client: &HttpClient,
    file: Option<PathBuf>,
    format: Option<String>,
    tag: Option<String>,
    include_archived: bool,
    output: &Output,
) -> Result<()> {
    let format = parse_format(format.as_deref())?;
    let options = ExportOptions {
        tag,
        include_archived,
    };

    match file {
        Some(path) => {
            let count = export_to_file(client, &path, format, &options)?;
            output.success(&format!(
                "Exported {} bookmark(s) to {}",
                count,
                path.display()
            ));
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            export(client, format.unwrap_or(Format::Json), &options, &mut out)?;
        }
    }
    Ok(())
}

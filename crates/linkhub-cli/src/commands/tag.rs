//! Tag command handlers

use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use linkhub_core::tags::{self, TagEdit};
use linkhub_core::HttpClient;

use super::exit_status;
use crate::output::Output;
use crate::prompt::confirm;

/// List all tags with usage counts
pub fn list(client: &HttpClient, output: &Output) -> Result<()> {
    let counts = tags::tag_counts(client).context("Failed to list tags")?;
    output.print_tag_counts(&counts);
    Ok(())
}

/// Create a tag
pub fn create(client: &HttpClient, name: String, output: &Output) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Tag name must not be empty");
    }
    let tag = client
        .create_tag(name)
        .with_context(|| format!("Failed to create tag '{}'", name))?;
    output.success(&format!("Created tag: {}", tag.name));
    output.print_tag(&tag);
    Ok(())
}

/// Rename a tag on every bookmark
pub fn rename(client: &HttpClient, old: String, new: String, output: &Output) -> Result<ExitCode> {
    let (old, new) = rename_names(&old, &new)?;
    if old == new {
        output.message("Tag names are identical; nothing to do.");
        return Ok(ExitCode::SUCCESS);
    }

    let edit = tags::rename_tag(client, old, new)
        .with_context(|| format!("Failed to rename tag '{}'", old))?;
    report(
        &edit,
        &format!("Renamed '{}' to '{}' on {} bookmark(s)", old, new, edit.changed),
        output,
    );
    Ok(exit_status(edit.is_complete()))
}

/// Trim both names of a rename, rejecting empty ones
fn rename_names<'a>(old: &'a str, new: &'a str) -> Result<(&'a str, &'a str)> {
    let (old, new) = (old.trim(), new.trim());
    if old.is_empty() {
        bail!("Tag name must not be empty");
    }
    if new.is_empty() {
        bail!("New tag name must not be empty");
    }
    Ok((old, new))
}

/// Remove a tag from every bookmark
pub fn delete(client: &HttpClient, name: String, yes: bool, output: &Output) -> Result<ExitCode> {
    if output.should_prompt() && !yes {
        println!("Remove tag '{}' from every bookmark carrying it.", name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let edit = tags::remove_tag(client, &name)
        .with_context(|| format!("Failed to remove tag '{}'", name))?;
    report(
        &edit,
        &format!("Removed '{}' from {} bookmark(s)", name, edit.changed),
        output,
    );
    Ok(exit_status(edit.is_complete()))
}

fn report(edit: &TagEdit, summary: &str, output: &Output) {
    if output.is_json() {
        let failures: Vec<_> = edit
            .failures
            .iter()
            .map(|(id, message)| serde_json::json!({"id": id, "message": message}))
            .collect();
        println!(
            "{}",
            serde_json::json!({"changed": edit.changed, "failures": failures})
        );
        return;
    }

    output.success(summary);
    for (id, message) in &edit.failures {
        eprintln!("⚠ Bookmark {}: {}", id, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_names_trims_both_sides() {
        assert_eq!(rename_names(" rust ", "rust").unwrap(), ("rust", "rust"));
        assert_eq!(rename_names("old", " new\t").unwrap(), ("old", "new"));
        assert!(rename_names("  ", "new").is_err());
        assert!(rename_names("old", " ").is_err());
    }
}

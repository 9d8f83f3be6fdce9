//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! Everything here goes to stdout; logs and errors go to stderr.

use serde::Serialize;

use linkhub_core::{ImportResult, RemoteBookmark, Tag, TagCount};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    }

    /// Print a single bookmark
    pub fn print_bookmark(&self, bookmark: &RemoteBookmark) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", bookmark.id);
                println!("Title:       {}", bookmark.title);
                println!("URL:         {}", bookmark.url);
                if !bookmark.description.is_empty() {
                    println!("Description: {}", bookmark.description);
                }
                if !bookmark.tag_names.is_empty() {
                    println!("Tags:        {}", bookmark.tag_names.join(", "));
                }
                let mut flags = Vec::new();
                if bookmark.unread {
                    flags.push("unread");
                }
                if bookmark.shared {
                    flags.push("shared");
                }
                if bookmark.is_archived {
                    flags.push("archived");
                }
                if !flags.is_empty() {
                    println!("Flags:       {}", flags.join(", "));
                }
                println!(
                    "Created:     {}",
                    bookmark.date_added.format("%Y-%m-%d %H:%M")
                );
                println!(
                    "Updated:     {}",
                    bookmark.date_modified.format("%Y-%m-%d %H:%M")
                );

                if !bookmark.notes.is_empty() {
                    println!();
                    println!("── Notes ──");
                    println!("{}", bookmark.notes);
                }
            }
            OutputFormat::Json => self.print_json(bookmark),
            OutputFormat::Quiet => {
                println!("{}", bookmark.id);
            }
        }
    }

    /// Print a list of bookmarks
    pub fn print_bookmarks(&self, bookmarks: &[RemoteBookmark]) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return;
                }
                for bookmark in bookmarks {
                    let title = if bookmark.title.is_empty() {
                        "(untitled)"
                    } else {
                        bookmark.title.as_str()
                    };
                    println!(
                        "{:>6} | {} | {}",
                        bookmark.id,
                        truncate(title, 35),
                        truncate(&bookmark.url, 45)
                    );
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => self.print_json(bookmarks),
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}", bookmark.id);
                }
            }
        }
    }

    /// Print tags with usage counts
    pub fn print_tag_counts(&self, tags: &[TagCount]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for tag in tags {
                    println!("{} ({})", tag.name, tag.count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => self.print_json(tags),
            OutputFormat::Quiet => {
                for tag in tags {
                    println!("{}", tag.name);
                }
            }
        }
    }

    /// Print a single tag
    pub fn print_tag(&self, tag: &Tag) {
        match self.format {
            OutputFormat::Human => println!("{} (id {})", tag.name, tag.id),
            OutputFormat::Json => self.print_json(tag),
            OutputFormat::Quiet => println!("{}", tag.id),
        }
    }

    /// Print the summary of an import run
    pub fn print_import_result(&self, result: &ImportResult, dry_run: bool) {
        match self.format {
            OutputFormat::Human => {
                if dry_run {
                    println!("Dry run - no changes were made.");
                }
                println!("Added:   {}", result.added);
                println!("Updated: {}", result.updated);
                println!("Skipped: {}", result.skipped);
                println!("Failed:  {}", result.failed);

                if !result.errors.is_empty() {
                    println!();
                    println!("── Errors ({}) ──", result.errors.len());
                    for error in &result.errors {
                        println!("line {}: {}", error.line, truncate_line(&error.message, 100));
                    }
                }
            }
            OutputFormat::Json => self.print_json(result),
            OutputFormat::Quiet => {
                // Errors only, one per line, so scripts can grep them
                for error in &result.errors {
                    println!("{}\t{}", error.line, error.message);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

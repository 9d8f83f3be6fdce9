//! Interactive prompts
//!
//! Confirmation, line entry and hidden token entry. Prompts are written to
//! stdout and answers read from stdin.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    // Check if stdin is a TTY
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}

/// Prompt with a default value; an empty answer keeps the default
pub fn prompt_with_default(prompt: &str, default: Option<&str>) -> Result<Option<String>> {
    match default {
        Some(default) if !default.is_empty() => print!("{} [{}]: ", prompt, default),
        _ => print!("{}: ", prompt),
    }
    io::stdout().flush()?;

    let answer = read_answer(io::stdin().lock())?;
    Ok(answer.or_else(|| default.map(str::to_string)))
}

/// Read one trimmed line; `None` when it is empty
fn read_answer<R: BufRead>(mut reader: R) -> Result<Option<String>> {
    let mut input = String::new();
    reader.read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}

/// Prompt for a secret without echoing it
pub fn prompt_secret(prompt: &str) -> Result<Option<String>> {
    let secret =
        rpassword::prompt_password(format!("{}: ", prompt)).context("Failed to read input")?;
    let secret = secret.trim();
    if secret.is_empty() {
        Ok(None)
    } else {
        Ok(Some(secret.to_string()))
    }
}

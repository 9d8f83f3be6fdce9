//! Config command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use linkhub_core::Config;

use crate::output::{Output, OutputFormat};
use crate::prompt::{prompt_secret, prompt_with_default};

const VALID_KEYS: &str = "url, token, timeout_secs, log_file";

fn effective_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path)
}

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let path = effective_path(config_path);
    let token = config.masked_token();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "url": config.url,
                    "token": token,
                    "timeout_secs": config.timeout_secs,
                    "log_file": config.log_file,
                    "config_file": path,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.url.as_deref().unwrap_or(""));
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!(
                "  url:          {}",
                config.url.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  token:        {}",
                token.as_deref().unwrap_or("(not set)")
            );
            println!("  timeout_secs: {}", config.timeout_secs);
            println!(
                "  log_file:     {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", path.display());
        }
    }

    Ok(())
}

/// Apply one `key = value` assignment
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let optional = |value: &str| {
        if value.is_empty() || value == "none" {
            None
        } else {
            Some(value.to_string())
        }
    };

    match key {
        "url" => {
            config.url = optional(value).map(|url| url.trim_end_matches('/').to_string());
        }
        "token" => {
            config.token = optional(value);
        }
        "timeout_secs" => {
            let secs: u64 = value
                .parse()
                .context("Invalid value for timeout_secs. Use a whole number of seconds.")?;
            if secs == 0 {
                bail!("timeout_secs must be greater than zero");
            }
            config.timeout_secs = secs;
        }
        "log_file" => {
            config.log_file = optional(value).map(PathBuf::from);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }
    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let path = effective_path(config_path);
    let mut config = Config::read_from_path(&path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;
    save(&config, &path)?;

    let shown = if key == "token" {
        config.masked_token().unwrap_or_default()
    } else {
        value
    };
    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

/// Prompt for the service URL and API token and save them
pub fn init(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let path = effective_path(config_path);
    let mut config = Config::read_from_path(&path).context("Failed to load configuration")?;

    println!("Configure the bookmark service (Enter keeps the current value).");
    println!();

    match prompt_with_default("Service URL", config.url.as_deref())? {
        Some(url) => apply(&mut config, "url", &url)?,
        None => bail!("A service URL is required"),
    }

    let token_prompt = match config.masked_token() {
        Some(masked) => format!("API token [{}]", masked),
        None => "API token".to_string(),
    };
    if let Some(token) = prompt_secret(&token_prompt)? {
        config.token = Some(token);
    }
    if config.token.is_none() {
        bail!("An API token is required");
    }

    save(&config, &path)?;
    output.success(&format!("Saved configuration to {}", path.display()));
    Ok(())
}

fn save(config: &Config, path: &Path) -> Result<()> {
    config
        .save_to_path(path)
        .context("Failed to save configuration")
}

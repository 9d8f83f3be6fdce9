//! Command handlers

pub mod bookmark;
pub mod config;
pub mod export;
pub mod import;
pub mod tag;

use std::process::ExitCode;

use anyhow::{Context, Result};

use linkhub_core::{Config, HttpClient};

/// Exit code when a command finished but some items were not processed
pub const PARTIAL_FAILURE: u8 = 2;

/// Build a client from configuration, failing early on missing credentials
pub fn connect(config: &Config) -> Result<HttpClient> {
    config.require_credentials()?;
    HttpClient::from_config(config).context("Failed to create HTTP client")
}

/// Exit code for a command that can partially fail
pub fn exit_status(complete: bool) -> ExitCode {
    if complete {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(PARTIAL_FAILURE)
    }
}

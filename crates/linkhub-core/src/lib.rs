//! linkhub core library
//!
//! This crate provides the client side of a self-hosted bookmark service:
//! the HTTP API client and the import/export engine built on top of it.
//!
//! # Architecture
//!
//! - **API**: `BookmarkApi` is the only capability the engine needs; `HttpClient`
//!   implements it against the REST service
//! - **Pagination**: every listing is read in full through `paginate`
//! - **Formats**: JSON, Netscape HTML and CSV parse into one `BookmarkRecord`
//!   shape and serialize from `RemoteBookmark`
//! - **Reconciliation**: `import` decides create/update/skip per record and
//!   reports the outcome as an `ImportResult`
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let client = HttpClient::from_config(&config)?;
//!
//! let result = import_file(&client, Path::new("bookmarks.html"), &ImportOptions::default())?;
//! println!("{} added, {} updated", result.added, result.updated);
//! ```
//!
//! # Modules
//!
//! - `api`: Service client and the `BookmarkApi` trait
//! - `models`: Records, remote bookmarks, drafts, tags and pages
//! - `paginate`: Pagination aggregator
//! - `formats`: File format parsers and serializers
//! - `import`: Import reconciler
//! - `export`: Exporter
//! - `report`: Import result accounting
//! - `tags`: Tag counting, renaming and removal across bookmarks
//! - `config`: Application configuration

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod formats;
pub mod import;
pub mod models;
pub mod paginate;
pub mod report;
pub mod tags;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, ApiResult, BookmarkApi, BookmarkFilter, HttpClient};
pub use config::Config;
pub use error::{ExchangeError, ExchangeResult};
pub use export::{export, export_to_file, ExportOptions};
pub use formats::{Format, ParseOutput};
pub use import::{import_file, import_str, reconcile, ImportOptions};
pub use models::{BookmarkDraft, BookmarkPatch, BookmarkRecord, Page, RemoteBookmark, Tag, TagCount};
pub use report::{ImportError, ImportResult, Outcome};
pub use tags::TagEdit;

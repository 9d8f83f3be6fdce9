//! linkhub CLI
//!
//! Command-line client for a self-hosted bookmark service: bookmark and tag
//! management plus bulk import and export.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use linkhub_core::{ApiError, BookmarkDraft, BookmarkPatch, Config, ExchangeError, HttpClient};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "linkhub")]
#[command(about = "linkhub - bookmark service client with import and export")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage bookmarks
    #[command(alias = "bm")]
    Bookmarks {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Manage tags
    Tags {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Import bookmarks from a JSON, HTML or CSV file
    Import {
        /// File to import
        file: PathBuf,
        /// File format (auto, json, html, csv)
        #[arg(short, long, default_value = "auto")]
        format: String,
        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Leave bookmarks that already exist untouched
        #[arg(long)]
        skip_duplicates: bool,
        /// Tag added to every imported bookmark
        #[arg(short = 't', long = "add-tag", value_name = "TAG")]
        add_tag: Vec<String>,
    },
    /// Export bookmarks to a file or stdout
    Export {
        /// Output file (format detected from extension); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// File format (json, html, csv)
        #[arg(short, long)]
        format: Option<String>,
        /// Only bookmarks with this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Include archived bookmarks
        #[arg(long)]
        include_archived: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// List archived bookmarks
        #[arg(long)]
        archived: bool,
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Search query
        #[arg(long)]
        query: Option<String>,
    },
    /// Show bookmark details
    Get {
        /// Bookmark ID
        id: u64,
    },
    /// Create a bookmark
    #[command(alias = "create")]
    Add(AddArgs),
    /// Change some fields of a bookmark
    #[command(alias = "edit")]
    Update(UpdateArgs),
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark ID
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Archive a bookmark
    Archive {
        /// Bookmark ID
        id: u64,
    },
    /// Unarchive a bookmark
    Unarchive {
        /// Bookmark ID
        id: u64,
    },
}

#[derive(Args)]
struct AddArgs {
    /// URL to save
    url: String,
    /// Title
    #[arg(short = 'T', long)]
    title: Option<String>,
    /// Description
    #[arg(short, long)]
    description: Option<String>,
    /// Notes
    #[arg(short, long)]
    notes: Option<String>,
    /// Tags to add
    #[arg(short, long)]
    tag: Vec<String>,
    /// Mark as unread
    #[arg(long)]
    unread: bool,
    /// Share with other users
    #[arg(long)]
    shared: bool,
    /// Archive right away
    #[arg(long)]
    archived: bool,
}

impl From<AddArgs> for BookmarkDraft {
    fn from(args: AddArgs) -> Self {
        let mut draft = BookmarkDraft::new(args.url.trim());
        draft.title = args.title.unwrap_or_default();
        draft.description = args.description.unwrap_or_default();
        draft.notes = args.notes.unwrap_or_default();
        for tag in args.tag {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !draft.tag_names.contains(&tag) {
                draft.tag_names.push(tag);
            }
        }
        draft.unread = args.unread;
        draft.shared = args.shared;
        draft.is_archived = args.archived;
        draft
    }
}

#[derive(Args)]
struct UpdateArgs {
    /// Bookmark ID
    id: u64,
    /// New title
    #[arg(short = 'T', long)]
    title: Option<String>,
    /// New description
    #[arg(short, long)]
    description: Option<String>,
    /// New notes
    #[arg(short, long)]
    notes: Option<String>,
    /// Replace the tags (repeat for several)
    #[arg(short, long)]
    tag: Vec<String>,
    /// Set the unread flag
    #[arg(long, value_name = "BOOL")]
    unread: Option<bool>,
    /// Set the shared flag
    #[arg(long, value_name = "BOOL")]
    shared: Option<bool>,
}

impl From<UpdateArgs> for BookmarkPatch {
    fn from(args: UpdateArgs) -> Self {
        BookmarkPatch {
            title: args.title,
            description: args.description,
            notes: args.notes,
            tag_names: if args.tag.is_empty() {
                None
            } else {
                Some(args.tag)
            },
            unread: args.unread,
            shared: args.shared,
        }
    }
}

#[derive(Subcommand)]
enum TagCommands {
    /// List tags with usage counts
    #[command(alias = "ls")]
    List,
    /// Create a tag
    Create {
        /// Tag name
        name: String,
    },
    /// Rename a tag on every bookmark
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
    /// Remove a tag from every bookmark
    #[command(alias = "rm")]
    Delete {
        /// Tag name
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (url, token, timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Set the service URL and API token interactively
    Init,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match run(cli, &output) {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output: &Output) -> Result<ExitCode> {
    let Cli {
        verbose,
        config: config_path,
        command,
        ..
    } = cli;

    let config = Config::load_with_cli_override(config_path.as_ref());
    init_logging(
        verbose,
        config.as_ref().ok().and_then(|c| c.log_file.as_deref()),
    );

    // Config commands work without a valid config or credentials
    let command = match command {
        Commands::Config { command } => {
            handle_config_command(command, config_path.as_ref(), output)?;
            return Ok(ExitCode::SUCCESS);
        }
        other => other,
    };

    let config = config.context("Failed to load configuration")?;
    let client = commands::connect(&config)?;
    debug!("Using service at {}", client.base_url());

    match command {
        Commands::Bookmarks { command } => {
            handle_bookmark_command(command, &client, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Tags { command } => handle_tag_command(command, &client, output),
        Commands::Import {
            file,
            format,
            dry_run,
            skip_duplicates,
            add_tag,
        } => commands::import::import(
            &client,
            file,
            Some(format),
            dry_run,
            skip_duplicates,
            add_tag,
            output,
        ),
        Commands::Export {
            output: file,
            format,
            tag,
            include_archived,
        } => {
            commands::export::export_bookmarks(
                &client,
                file,
                format,
                tag,
                include_archived,
                output,
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_bookmark_command(
    command: BookmarkCommands,
    client: &HttpClient,
    output: &Output,
) -> Result<()> {
    match command {
        BookmarkCommands::List {
            archived,
            tag,
            query,
        } => commands::bookmark::list(client, archived, tag, query, output),
        BookmarkCommands::Get { id } => commands::bookmark::get(client, id, output),
        BookmarkCommands::Add(args) => commands::bookmark::add(client, args.into(), output),
        BookmarkCommands::Update(args) => {
            let id = args.id;
            commands::bookmark::update(client, id, args.into(), output)
        }
        BookmarkCommands::Delete { id, yes } => commands::bookmark::delete(client, id, yes, output),
        BookmarkCommands::Archive { id } => commands::bookmark::archive(client, id, output),
        BookmarkCommands::Unarchive { id } => commands::bookmark::unarchive(client, id, output),
    }
}

fn handle_tag_command(
    command: TagCommands,
    client: &HttpClient,
    output: &Output,
) -> Result<ExitCode> {
    match command {
        TagCommands::List => {
            commands::tag::list(client, output)?;
            Ok(ExitCode::SUCCESS)
        }
        TagCommands::Create { name } => {
            commands::tag::create(client, name, output)?;
            Ok(ExitCode::SUCCESS)
        }
        TagCommands::Rename { old, new } => commands::tag::rename(client, old, new, output),
        TagCommands::Delete { name, yes } => commands::tag::delete(client, name, yes, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
        Some(ConfigCommands::Init) => commands::config::init(config_path, output),
    }
}

/// Default filter for a `-v` count
fn log_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,linkhub_core={0},linkhub={0}", level)
}

/// Initialize logging
///
/// Logs go to stderr, or to `log_file` when configured. RUST_LOG overrides
/// the level chosen with `-v`.
fn init_logging(verbose: u8, log_file: Option<&Path>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(verbose)));

    if let Some(path) = log_file {
        match File::options().create(true).append(true).open(path) {
            Ok(file) => {
                // Ignore error if already initialized
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Print a fatal error with a recovery hint when one is known
fn report_error(err: &anyhow::Error) {
    eprintln!("Error: {:#}", err);

    let suggestion = err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ExchangeError>() {
            e.recovery_suggestion()
        } else if let Some(e) = cause.downcast_ref::<ApiError>() {
            e.recovery_suggestion()
        } else {
            None
        }
    });
    if let Some(hint) = suggestion {
        eprintln!("Hint: {}", hint);
    }
}

//! Diary CLI
//!
//! Command-line interface for diary - mood-tagged journal entries and a profile page.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use diary_core::export::BookOptions;
use diary_core::{Config, EntryStore, ProfileBook};

mod commands;
mod editor;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "diary")]
#[command(about = "Diary - a local journal of mood-tagged entries")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new entry (opens editor if no text is given)
    Add {
        /// Entry text
        text: Vec<String>,
        /// Mood tag
        #[arg(short, long, default_value = "")]
        mood: String,
    },
    /// List entries, newest first
    #[command(alias = "ls")]
    List {
        /// Only show the newest N entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show an entry in full
    Show {
        /// Entry ID (full or prefix)
        id: String,
    },
    /// Change an entry's text or mood
    Update {
        /// Entry ID (full or prefix)
        id: String,
        /// New text
        #[arg(short, long)]
        text: Option<String>,
        /// New mood
        #[arg(short, long)]
        mood: Option<String>,
    },
    /// Edit an entry in $EDITOR
    Edit {
        /// Entry ID (full or prefix)
        id: String,
    },
    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Entry ID (full or prefix)
        id: String,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Merge entries from a JSON file
    Import {
        /// JSON file holding an array of entries
        file: PathBuf,
    },
    /// Export entries
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Show or fill in the profile page
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Every entry as JSON
    Json {
        /// Output file ("-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// A paginated text book, oldest entry first
    Book {
        /// Output file ("-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Print the profile
    Show,
    /// Set a field (empty value clears it)
    Set { key: String, value: String },
    /// Add an item to a list field
    Add { key: String, item: String },
    /// Remove an item from a list field by position (1-based)
    #[command(alias = "rm")]
    Remove { key: String, position: usize },
    /// Replace the profile with a JSON file
    Import { file: PathBuf },
    /// Export the profile
    Export {
        #[command(subcommand)]
        command: ProfileExportCommands,
    },
}

#[derive(Subcommand)]
enum ProfileExportCommands {
    /// The stored profile as JSON
    Json {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// The profile as printable text
    Text {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands load and save the config file themselves
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config = Config::load_with_cli_override(config_path)?;
    init_logging(&config, cli.verbose);
    debug!(data_dir = %config.data_dir.display(), "configuration loaded");

    match cli.command {
        Commands::Profile { command } => {
            let mut book = ProfileBook::open_with_config(&config);
            handle_profile_command(command, &mut book, &output)
        }
        command => {
            let mut store = EntryStore::open_with_config(&config);
            handle_entry_command(command, &mut store, &config, &output)
        }
    }
}

type Store = EntryStore<diary_core::FilePersistence>;
type Profile = ProfileBook<diary_core::FilePersistence>;

fn handle_entry_command(
    command: Commands,
    store: &mut Store,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        Commands::Add { text, mood } => commands::entry::add(store, text, mood, output),
        Commands::List { limit } => commands::entry::list(store, limit, output),
        Commands::Show { id } => commands::entry::show(store, id, output),
        Commands::Update { id, text, mood } => {
            commands::entry::update(store, id, text, mood, output)
        }
        Commands::Edit { id } => commands::entry::edit(store, id, output),
        Commands::Delete { id, yes } => commands::entry::delete(store, id, yes, output),
        Commands::Import { file } => commands::transfer::import(store, &file, output),
        Commands::Export { command } => match command {
            ExportCommands::Json { output: out } => {
                commands::transfer::export_json(store, out, output)
            }
            ExportCommands::Book { output: out } => {
                let options = BookOptions::from_config(config);
                commands::transfer::export_book(store, &options, out, output)
            }
        },
        Commands::Profile { .. } | Commands::Config { .. } => unreachable!(), // Handled in main
    }
}

fn handle_profile_command(
    command: Option<ProfileCommands>,
    book: &mut Profile,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ProfileCommands::Show) | None => commands::profile::show(book, output),
        Some(ProfileCommands::Set { key, value }) => {
            commands::profile::set(book, key, value, output)
        }
        Some(ProfileCommands::Add { key, item }) => commands::profile::add(book, key, item, output),
        Some(ProfileCommands::Remove { key, position }) => {
            commands::profile::remove(book, key, position, output)
        }
        Some(ProfileCommands::Import { file }) => commands::profile::import(book, &file, output),
        Some(ProfileCommands::Export { command }) => match command {
            ProfileExportCommands::Json { output: out } => {
                commands::profile::export_json(book, out, output)
            }
            ProfileExportCommands::Text { output: out } => {
                commands::profile::export_text(book, out, output)
            }
        },
    }
}

/// Initialize logging
///
/// Level is `warn`, or `debug` with `--verbose`; `RUST_LOG` wins when set.
/// Logs go to `config.log_file` when configured, otherwise to stderr.
fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("diary_core={},diary_cli={}", level, level)));

    match &config.log_file {
        Some(log_path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

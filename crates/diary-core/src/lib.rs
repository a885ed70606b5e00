//! Diary Core Library
//!
//! This crate provides the core functionality for diary, a local journal of
//! mood-tagged entries with an "about me" profile page.
//!
//! # Architecture
//!
//! - **EntryStore**: sole owner of the journal entries and the edit session
//! - **ProfileBook**: the schema-driven profile form
//! - **Persistence**: one byte blob per fixed key, written on every change
//!
//! Renderers (the CLI) read snapshots and call store operations; exporters
//! turn snapshots into JSON or a paginated book. Neither mutates state
//! directly.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = EntryStore::open_with_config(&config);
//!
//! let entry = store.add("Had a good day", "happy")?;
//! store.begin_edit(&entry.id)?;
//! store.save_edit("Had a great day", "happy")?;
//!
//! let json = export::to_json(store.snapshot())?;
//! ```
//!
//! # Modules
//!
//! - `store`: the entry store (main entry point)
//! - `models`: `Entry` and import candidates
//! - `session`: edit session state
//! - `codec`: blob encoding and import parsing
//! - `export`: JSON and book exports
//! - `profile`: the profile form
//! - `storage`: persistence adapters
//! - `config`: application configuration

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod profile;
pub mod session;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{EntryError, ProfileError};
pub use models::{Entry, PartialEntry};
pub use profile::{FieldKind, FieldSpec, ProfileBook, DEFAULT_SCHEMA};
pub use session::EditSession;
pub use storage::{FilePersistence, MemoryPersistence, Persistence, StorageError};
pub use store::{EntryStore, ImportSummary};

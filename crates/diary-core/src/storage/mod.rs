//! Storage layer
//!
//! Stores talk to a [`Persistence`]: a byte blob kept under one fixed key.
//! The store decides what the bytes mean; persistence only moves them.
//!
//! ## Implementations
//!
//! - [`FilePersistence`]: one JSON file per key, atomic writes
//! - [`MemoryPersistence`]: in-memory blob for tests and embedding

pub mod error;
pub mod memory;
pub mod persistence;

use std::path::PathBuf;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryPersistence;
pub use persistence::FilePersistence;

/// Key-value byte store with a single fixed key
pub trait Persistence {
    /// Read the stored blob, `None` if nothing has been written yet
    fn get(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replace the stored blob
    fn put(&mut self, blob: &[u8]) -> StorageResult<()>;

    /// Keep a copy of a blob that could not be decoded
    ///
    /// Called before the store starts over with an empty state, so the next
    /// `put` does not destroy the only copy. Returns where the copy went.
    fn preserve_corrupt(&mut self) -> StorageResult<Option<PathBuf>> {
        Ok(None)
    }
}

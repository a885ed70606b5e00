use std::io;
use std::path::PathBuf;

use super::error::{StorageError, StorageResult};
use super::Persistence;

/// In-memory persistence
///
/// Keeps the last written blob and counts writes. `fail_writes` makes every
/// `put` fail, which lets callers exercise the "durability lost" path.
/// `preserve_corrupt` copies the blob into a separate backup slot.
#[derive(Debug, Default, Clone)]
pub struct MemoryPersistence {
    blob: Option<Vec<u8>>,
    backup: Option<Vec<u8>>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing blob, as if loaded from disk
    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Some(blob.into()),
            ..Self::default()
        }
    }

    pub fn blob(&self) -> Option<&[u8]> {
        self.blob.as_deref()
    }

    /// Blob saved by the last `preserve_corrupt`
    pub fn backup(&self) -> Option<&[u8]> {
        self.backup.as_deref()
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl Persistence for MemoryPersistence {
    fn get(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.blob.clone())
    }

    fn put(&mut self, blob: &[u8]) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::WriteError {
                path: PathBuf::from("<memory>"),
                source: io::Error::new(io::ErrorKind::Other, "writes disabled"),
            });
        }
        self.blob = Some(blob.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn preserve_corrupt(&mut self) -> StorageResult<Option<PathBuf>> {
        if self.blob.is_none() {
            return Ok(None);
        }
        self.backup = self.blob.clone();
        Ok(Some(PathBuf::from("<memory backup>")))
    }
}

//! File-backed persistence
//!
//! Each store writes one blob under one fixed key. The key maps to a JSON
//! file in the data directory:
//!
//! - `diaryEntries.json` - the journal entries
//! - `diaryData.json` - the profile form
//!
//! Writes are atomic (write to temp file, then rename) so a crash never leaves
//! a half-written blob behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::Persistence;

/// Persistence for a single key stored as a file
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Persist `key` as `<data_dir>/<key>.json`
    pub fn new(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", key)),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a blob exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Path where an unreadable blob is copied before it can be overwritten
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt.backup");
        PathBuf::from(name)
    }
}

impl Persistence for FilePersistence {
    fn get(&self) -> StorageResult<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes =
            fs::read(&self.path).map_err(|e| StorageError::from_read(e, self.path.clone()))?;
        Ok(Some(bytes))
    }

    fn put(&mut self, blob: &[u8]) -> StorageResult<()> {
        atomic_write(&self.path, blob)?;
        debug!(path = %self.path.display(), bytes = blob.len(), "blob written");
        Ok(())
    }

    fn preserve_corrupt(&mut self) -> StorageResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let backup = self.backup_path();
        fs::copy(&self.path, &backup).map_err(|e| StorageError::from_io(e, backup.clone()))?;
        Ok(Some(backup))
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = FilePersistence::new(temp_dir.path(), "diaryEntries");

        assert!(!persistence.exists());
        assert!(persistence.get().unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut persistence = FilePersistence::new(temp_dir.path(), "diaryEntries");

        persistence.put(b"[]").unwrap();
        assert!(persistence.exists());
        assert!(persistence.path().ends_with("diaryEntries.json"));
        assert_eq!(persistence.get().unwrap().unwrap(), b"[]");

        persistence.put(b"[1]").unwrap();
        assert_eq!(persistence.get().unwrap().unwrap(), b"[1]");
        assert!(!persistence.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_keys_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let mut entries = FilePersistence::new(temp_dir.path(), "diaryEntries");
        let profile = FilePersistence::new(temp_dir.path(), "diaryData");

        entries.put(b"[]").unwrap();
        assert!(profile.get().unwrap().is_none());
    }

    #[test]
    fn test_preserve_corrupt_copies_blob() {
        let temp_dir = TempDir::new().unwrap();
        let mut persistence = FilePersistence::new(temp_dir.path(), "diaryEntries");

        assert!(persistence.preserve_corrupt().unwrap().is_none());

        persistence.put(b"{not json").unwrap();
        let backup = persistence.preserve_corrupt().unwrap().unwrap();
        assert_eq!(fs::read(&backup).unwrap(), b"{not json");
        assert!(backup.to_string_lossy().ends_with("diaryEntries.json.corrupt.backup"));
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("file.json");

        atomic_write(&nested_path, b"test data").unwrap();

        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
    }
}

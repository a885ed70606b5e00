//! Command handlers

pub mod config;
pub mod entry;
pub mod profile;
pub mod transfer;

use std::path::Path;

use anyhow::{Context, Result};

/// Write an export to `path`, or to stdout when the path is `-`
pub(crate) fn write_export(path: &Path, content: &str) -> Result<bool> {
    if path == Path::new("-") {
        print!("{}", content);
        return Ok(false);
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(true)
}

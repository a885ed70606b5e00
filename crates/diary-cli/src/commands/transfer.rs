//! Import and export handlers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use diary_core::export::{self, BookOptions, ExportKind};
use diary_core::{codec, Clock, EntryStore, Persistence};

use crate::commands::write_export;
use crate::output::Output;

const FILE_PREFIX: &str = "diary";

/// Merge entries from a JSON file into the journal
pub fn import<P: Persistence, C: Clock>(
    store: &mut EntryStore<P, C>,
    file: &Path,
    output: &Output,
) -> Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;
    let candidates = codec::parse_import(&content)
        .with_context(|| format!("Could not import {:?}", file))?;

    let summary = store.import_merge(candidates);
    output.print_import_summary(&summary);
    output.saved(store.last_saved());
    Ok(())
}

/// Export every entry as pretty-printed JSON
pub fn export_json<P: Persistence, C: Clock>(
    store: &EntryStore<P, C>,
    out: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let json = export::to_json(store.snapshot()).context("Failed to serialize entries")?;
    let path = out.unwrap_or_else(|| default_path(ExportKind::Json));
    if write_export(&path, &json)? {
        output.success(&format!(
            "Exported {} entries to {}",
            store.len(),
            path.display()
        ));
    }
    Ok(())
}

/// Export the journal as a paginated book, oldest entry first
pub fn export_book<P: Persistence, C: Clock>(
    store: &EntryStore<P, C>,
    options: &BookOptions,
    out: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let book = export::book(store.snapshot(), options);
    let path = out.unwrap_or_else(|| default_path(ExportKind::Book));
    if write_export(&path, &book.render())? {
        output.success(&format!(
            "Exported {} pages to {}",
            book.page_count(),
            path.display()
        ));
    }
    Ok(())
}

fn default_path(kind: ExportKind) -> PathBuf {
    PathBuf::from(export::export_file_name(
        FILE_PREFIX,
        kind,
        Local::now().date_naive(),
    ))
}

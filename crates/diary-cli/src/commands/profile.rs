//! Profile command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use diary_core::{Clock, FieldKind, Persistence, ProfileBook};

use crate::commands::write_export;
use crate::output::{Output, OutputFormat};

/// Print the whole profile
pub fn show<P: Persistence, C: Clock>(book: &ProfileBook<P, C>, output: &Output) -> Result<()> {
    match output.format {
        OutputFormat::Human => print!("{}", book.render_text()),
        OutputFormat::Json => {
            println!("{}", book.to_json().context("Failed to serialize profile")?)
        }
        OutputFormat::Quiet => {
            for spec in book.schema() {
                if book.data().contains_key(spec.key) {
                    println!("{}", spec.key);
                }
            }
        }
    }
    Ok(())
}

/// Set a single-value field; an empty value clears it
pub fn set<P: Persistence, C: Clock>(
    book: &mut ProfileBook<P, C>,
    key: String,
    value: String,
    output: &Output,
) -> Result<()> {
    book.set_field(&key, &value).map_err(|e| with_field_hint(e.into(), book))?;
    if value.trim().is_empty() {
        output.success(&format!("Cleared {}", key));
    } else {
        output.success(&format!("Set {} = {}", key, value.trim()));
    }
    output.saved(book.last_saved());
    Ok(())
}

/// Append an item to a list field
pub fn add<P: Persistence, C: Clock>(
    book: &mut ProfileBook<P, C>,
    key: String,
    item: String,
    output: &Output,
) -> Result<()> {
    book.add_to_list(&key, &item).map_err(|e| with_field_hint(e.into(), book))?;
    output.success(&format!("Added to {}: {}", key, item.trim()));
    output.saved(book.last_saved());
    Ok(())
}

/// Remove the item at a 1-based position from a list field
pub fn remove<P: Persistence, C: Clock>(
    book: &mut ProfileBook<P, C>,
    key: String,
    position: usize,
    output: &Output,
) -> Result<()> {
    if position == 0 {
        bail!("Positions start at 1");
    }

    match book
        .remove_from_list(&key, position - 1)
        .map_err(|e| with_field_hint(e.into(), book))?
    {
        Some(item) => {
            output.success(&format!("Removed from {}: {}", key, item));
            output.saved(book.last_saved());
        }
        None => output.message(&format!("{} has no item {}", key, position)),
    }
    Ok(())
}

/// Replace the profile with the contents of a JSON file
pub fn import<P: Persistence, C: Clock>(
    book: &mut ProfileBook<P, C>,
    file: &Path,
    output: &Output,
) -> Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;
    book.import(&content)
        .with_context(|| format!("Could not import {:?}", file))?;

    output.success(&format!("Imported profile from {}", file.display()));
    output.saved(book.last_saved());
    Ok(())
}

/// Export the profile as JSON
pub fn export_json<P: Persistence, C: Clock>(
    book: &ProfileBook<P, C>,
    out: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let json = book.to_json().context("Failed to serialize profile")?;
    let path = out.unwrap_or_else(|| PathBuf::from("profile.json"));
    if write_export(&path, &json)? {
        output.success(&format!("Exported profile to {}", path.display()));
    }
    Ok(())
}

/// Export the profile as printable text
pub fn export_text<P: Persistence, C: Clock>(
    book: &ProfileBook<P, C>,
    out: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let path = out.unwrap_or_else(|| PathBuf::from("profile.txt"));
    if write_export(&path, &book.render_text())? {
        output.success(&format!("Exported profile to {}", path.display()));
    }
    Ok(())
}

/// Append the list of valid keys to an unknown-field error
fn with_field_hint<P: Persistence, C: Clock>(
    error: anyhow::Error,
    book: &ProfileBook<P, C>,
) -> anyhow::Error {
    if !matches!(
        error.downcast_ref::<diary_core::ProfileError>(),
        Some(diary_core::ProfileError::UnknownField(_))
    ) {
        return error;
    }

    let keys: Vec<String> = book
        .schema()
        .iter()
        .map(|spec| match spec.kind {
            FieldKind::List { .. } => format!("{} (list)", spec.key),
            _ => spec.key.to_string(),
        })
        .collect();
    error.context(format!("Valid fields: {}", keys.join(", ")))
}

//! Blob encoding for entries
//!
//! The persisted blob and the JSON export share one shape: an array of entry
//! objects. Decoding works record by record so one bad record costs only
//! itself, never the whole blob.

use serde_json::Value;
use tracing::warn;

use crate::error::EntryError;
use crate::models::{Entry, PartialEntry};

/// Entries recovered from a blob, plus how many records were unusable
#[derive(Debug, Default)]
pub struct Decoded {
    pub entries: Vec<Entry>,
    pub skipped: usize,
}

/// Encode entries as a compact JSON array
pub fn encode(entries: &[Entry]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(entries)
}

/// Encode entries as pretty-printed JSON
pub fn encode_pretty(entries: &[Entry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

/// Decode a persisted blob
///
/// The top level must be an array; anything else is `MalformedInput`.
/// Records missing `id`, `text` or `createdAt` are skipped.
pub fn decode(bytes: &[u8]) -> Result<Decoded, EntryError> {
    let records = parse_array(bytes)?;
    let mut decoded = Decoded::default();

    for (index, record) in records.into_iter().enumerate() {
        let Value::Object(object) = record else {
            warn!(index, "skipping non-object record in stored blob");
            decoded.skipped += 1;
            continue;
        };
        let partial = PartialEntry::from_object(object);
        match (partial.id, partial.text, partial.created_at) {
            (Some(id), Some(text), Some(created_at)) => decoded.entries.push(Entry {
                id,
                text,
                mood: partial.mood.unwrap_or_default(),
                created_at,
                extra: partial.extra,
            }),
            _ => {
                warn!(index, "skipping incomplete record in stored blob");
                decoded.skipped += 1;
            }
        }
    }

    Ok(decoded)
}

/// Parse an import payload into merge candidates
///
/// Only the top level is strict: it must be a JSON array. Elements that are
/// not objects are dropped; objects become candidates with whatever fields
/// they carry.
pub fn parse_import(text: &str) -> Result<Vec<PartialEntry>, EntryError> {
    let records = parse_array(text.as_bytes())?;
    let mut candidates = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        match record {
            Value::Object(object) => candidates.push(PartialEntry::from_object(object)),
            other => warn!(index, kind = value_kind(&other), "skipping non-object import record"),
        }
    }

    Ok(candidates)
}

fn parse_array(bytes: &[u8]) -> Result<Vec<Value>, EntryError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| EntryError::MalformedInput(format!("invalid JSON: {}", e)))?;
    match value {
        Value::Array(records) => Ok(records),
        other => Err(EntryError::MalformedInput(format!(
            "expected a JSON array, found {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

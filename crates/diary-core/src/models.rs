//! Data models for diary
//!
//! Defines the journal [`Entry`] and the lenient [`PartialEntry`] used when
//! importing records from outside the store.
//!
//! Entries serialize to the same shape the store persists:
//!
//! ```text
//! { "id": "...", "text": "...", "mood": "...", "createdAt": 1700000000000 }
//! ```
//!
//! Keys we don't recognise are kept in `extra` and written back out, so a
//! record that passes through import and export keeps everything it came with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single journal record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Stable identifier, unique within a store
    pub id: String,
    /// The journal body
    pub text: String,
    /// Optional short mood label (may be empty)
    #[serde(default)]
    pub mood: String,
    /// Creation time in milliseconds since the epoch. Never changes.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    /// Unrecognised fields, preserved on round-trip
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    /// Create an entry with the given identity and content
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        mood: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            mood: mood.into(),
            created_at,
            extra: Map::new(),
        }
    }

    /// Whether a mood label is set
    pub fn has_mood(&self) -> bool {
        !self.mood.trim().is_empty()
    }
}

/// An import candidate whose core fields may be missing
///
/// Missing fields are filled in by the store when the candidate is merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialEntry {
    pub id: Option<String>,
    pub text: Option<String>,
    pub mood: Option<String>,
    pub created_at: Option<i64>,
    pub extra: Map<String, Value>,
}

impl PartialEntry {
    /// Build a candidate from an arbitrary JSON object
    ///
    /// Field types are checked leniently: a numeric `id` is stringified, a
    /// fractional `createdAt` is truncated, and anything of the wrong type is
    /// treated as missing. All other keys land in `extra`.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let id = match object.remove("id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let text = match object.remove("text") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let mood = match object.remove("mood") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let created_at = match object.remove("createdAt") {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            _ => None,
        };

        Self {
            id,
            text,
            mood,
            created_at,
            extra: object,
        }
    }

    /// Candidate carrying an explicit id and text
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

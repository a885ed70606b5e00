//! Profile form
//!
//! The profile is the "all about me" page of the diary: a fixed, ordered
//! schema of fields, each either a single value or a list of items. The
//! values live in a JSON object keyed by field key, persisted under its own
//! storage key, separate from the journal entries.
//!
//! Keys that are not in the schema (for example from an imported file) are
//! kept and written back out, they just aren't shown.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::ProfileError;
use crate::storage::{FilePersistence, Persistence};

/// What kind of input a field takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// `YYYY-MM-DD`
    Date,
    List {
        placeholder: &'static str,
    },
}

impl FieldKind {
    pub fn is_list(&self) -> bool {
        matches!(self, FieldKind::List { .. })
    }
}

/// One field of the profile schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Text,
    }
}

const fn list(key: &'static str, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::List { placeholder },
    }
}

/// The standard profile page
pub const DEFAULT_SCHEMA: &[FieldSpec] = &[
    text("name", "Name"),
    text("nickname", "Nickname"),
    FieldSpec {
        key: "age",
        label: "Age",
        kind: FieldKind::Number,
    },
    FieldSpec {
        key: "birthday",
        label: "Birthday",
        kind: FieldKind::Date,
    },
    text("favColor", "Favourite Colour"),
    list("favFood", "Favourite Foods", "Add food..."),
    text("favDrink", "Favourite Drink"),
    text("favGame", "Favourite Game"),
    text("favMovie", "Favourite Movie"),
    text("favSong", "Favourite Song"),
    text("favHobby", "Favourite Hobby"),
    text("favSubject", "Favourite Subject"),
    list("bestFriends", "Best Friends", "Add friend..."),
    text("mostApp", "Most Used App"),
    text("mostThing", "Thing I Do the Most"),
    list("bestMemories", "Best Memories", "Add memory..."),
    list("worstExp", "Worst Experiences", "Add experience..."),
    text("fear", "Biggest Fear"),
    text("dreamJob", "Dream Job"),
    text("dreamPlace", "Dream Place to Visit"),
    text("cantLive", "One Thing I Can\u{2019}t Live Without"),
    text("strength", "My Strength"),
    text("weakness", "My Weakness"),
    text("happy", "What Makes Me Happy"),
    text("sad", "What Makes Me Sad"),
    text("goal", "Goal for This Year"),
];

/// The profile form and where it is saved
pub struct ProfileBook<P: Persistence, C: Clock = SystemClock> {
    schema: &'static [FieldSpec],
    data: Map<String, Value>,
    persistence: P,
    clock: C,
    last_saved: Option<i64>,
}

impl ProfileBook<FilePersistence, SystemClock> {
    /// Open the profile in the configured data directory and load it
    pub fn open_with_config(config: &Config) -> Self {
        let persistence = FilePersistence::new(&config.data_dir, &config.profile_key);
        let mut book = Self::new(DEFAULT_SCHEMA, persistence, SystemClock);
        book.load();
        book
    }
}

impl<P: Persistence, C: Clock> ProfileBook<P, C> {
    pub fn new(schema: &'static [FieldSpec], persistence: P, clock: C) -> Self {
        Self {
            schema,
            data: Map::new(),
            persistence,
            clock,
            last_saved: None,
        }
    }

    /// Read the persisted profile. Anything but a JSON object counts as empty.
    pub fn load(&mut self) -> &Map<String, Value> {
        let blob = match self.persistence.get() {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "could not read stored profile, starting empty");
                None
            }
        };

        self.data = match blob.map(|bytes| serde_json::from_slice::<Value>(&bytes)) {
            None => Map::new(),
            Some(Ok(Value::Object(map))) => map,
            Some(Ok(_)) | Some(Err(_)) => {
                warn!("stored profile is malformed, starting empty");
                if let Err(e) = self.persistence.preserve_corrupt() {
                    warn!(error = %e, "could not back up malformed profile");
                }
                Map::new()
            }
        };

        debug!(fields = self.data.len(), "profile loaded");
        &self.data
    }

    pub fn schema(&self) -> &'static [FieldSpec] {
        self.schema
    }

    pub fn spec(&self, key: &str) -> Option<&'static FieldSpec> {
        self.schema.iter().find(|spec| spec.key == key)
    }

    /// Raw stored data, including keys outside the schema
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Value of a single-value field, as text
    pub fn field(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Items of a list field (empty if unset)
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.data.get(key) {
            Some(Value::Array(items)) => items.iter().map(item_text).collect(),
            _ => Vec::new(),
        }
    }

    /// Set a single-value field. The value is trimmed; empty clears it.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), ProfileError> {
        let spec = self.require(key)?;
        let value = value.trim();

        match spec.kind {
            FieldKind::List { .. } => {
                return Err(ProfileError::WrongKind {
                    key: key.to_string(),
                    expected: "list",
                })
            }
            FieldKind::Number if !value.is_empty() && value.parse::<f64>().is_err() => {
                return Err(ProfileError::InvalidValue {
                    key: key.to_string(),
                    details: format!("'{}' is not a number", value),
                });
            }
            FieldKind::Date
                if !value.is_empty() && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() =>
            {
                return Err(ProfileError::InvalidValue {
                    key: key.to_string(),
                    details: format!("'{}' is not a YYYY-MM-DD date", value),
                });
            }
            _ => {}
        }

        self.data
            .insert(key.to_string(), Value::String(value.to_string()));
        debug!(key, "profile field set");
        self.persist();
        Ok(())
    }

    /// Append an item to a list field
    pub fn add_to_list(&mut self, key: &str, item: &str) -> Result<(), ProfileError> {
        let spec = self.require(key)?;
        if !spec.kind.is_list() {
            return Err(ProfileError::WrongKind {
                key: key.to_string(),
                expected: "single-value",
            });
        }

        let item = item.trim();
        if item.is_empty() {
            return Err(ProfileError::EmptyItem(key.to_string()));
        }

        let slot = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            items.push(Value::String(item.to_string()));
        }

        debug!(key, "profile list item added");
        self.persist();
        Ok(())
    }

    /// Remove the item at `index` from a list field
    ///
    /// Returns the removed item. An index past the end is a no-op.
    pub fn remove_from_list(
        &mut self,
        key: &str,
        index: usize,
    ) -> Result<Option<String>, ProfileError> {
        let spec = self.require(key)?;
        if !spec.kind.is_list() {
            return Err(ProfileError::WrongKind {
                key: key.to_string(),
                expected: "single-value",
            });
        }

        let removed = match self.data.get_mut(key) {
            Some(Value::Array(items)) if index < items.len() => items.remove(index),
            _ => return Ok(None),
        };

        debug!(key, index, "profile list item removed");
        self.persist();
        Ok(Some(item_text(&removed)))
    }

    /// Replace the whole profile with an imported JSON object
    pub fn import(&mut self, json: &str) -> Result<(), ProfileError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ProfileError::Malformed(format!("invalid JSON: {}", e)))?;
        let Value::Object(map) = value else {
            return Err(ProfileError::Malformed("expected a JSON object".to_string()));
        };

        info!(fields = map.len(), "profile imported");
        self.data = map;
        self.persist();
        Ok(())
    }

    /// Pretty-printed JSON of everything stored
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.data)
    }

    /// The profile as a printable list of lines, in schema order
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        for spec in self.schema {
            lines.push(format!("{}:", spec.label));
            if spec.kind.is_list() {
                let items = self.list(spec.key);
                if items.is_empty() {
                    lines.push("  -".to_string());
                }
                lines.extend(items.into_iter().map(|item| format!("  - {}", item)));
            } else {
                match self.field(spec.key) {
                    Some(value) if !value.is_empty() => lines.push(format!("  {}", value)),
                    _ => lines.push("  -".to_string()),
                }
            }
            lines.push(String::new());
        }

        lines
    }

    pub fn render_text(&self) -> String {
        self.render_lines().join("\n")
    }

    pub fn last_saved(&self) -> Option<i64> {
        self.last_saved
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn require(&self, key: &str) -> Result<&'static FieldSpec, ProfileError> {
        self.spec(key)
            .ok_or_else(|| ProfileError::UnknownField(key.to_string()))
    }

    fn persist(&mut self) {
        let blob = match serde_json::to_vec(&self.data) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "could not encode profile, not saved");
                return;
            }
        };

        match self.persistence.put(&blob) {
            Ok(()) => self.last_saved = Some(self.clock.now_millis()),
            Err(e) => warn!(error = %e, "could not save profile, changes are kept in memory"),
        }
    }
}

fn item_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

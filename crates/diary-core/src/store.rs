//! Entry store
//!
//! The `EntryStore` owns the canonical, ordered list of journal entries and is
//! the only thing allowed to change it. Every mutation goes through one of its
//! operations, and every successful mutation is written through to
//! [`Persistence`] exactly once.
//!
//! ## Ordering
//!
//! Entries are kept newest first by `created_at`. Two operations override
//! that: `add` and `update` put the touched entry at the front, even if an
//! older `created_at` would sort it further down. `load` and `import_merge`
//! re-sort by `created_at` and drop the override.
//!
//! ## Edit session
//!
//! The store also tracks a single [`EditSession`]. `begin_edit` points it at
//! an entry; `save_edit` either updates that entry or, when idle, adds a new
//! one. If the entry disappears while it is being edited, `save_edit` resets
//! the session and returns `None` instead of resurrecting it.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = EntryStore::open_with_config(&config);
//!
//! let entry = store.add("Had a good day", "happy")?;
//! store.update(&entry.id, "Had a great day", "happy")?;
//!
//! for entry in store.snapshot() {
//!     println!("{}", entry.text);
//! }
//! ```

use std::collections::HashSet;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::codec;
use crate::config::Config;
use crate::error::EntryError;
use crate::models::{Entry, PartialEntry};
use crate::session::EditSession;
use crate::storage::{FilePersistence, Persistence};

/// Outcome of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Candidates appended to the store
    pub added: usize,
    /// Candidates whose id already existed
    pub skipped: usize,
}

/// The journal: entries, edit session, and the persistence they are saved to
pub struct EntryStore<P: Persistence, C: Clock = SystemClock> {
    entries: Vec<Entry>,
    session: EditSession,
    persistence: P,
    clock: C,
    /// Time of the last successful write
    last_saved: Option<i64>,
}

impl EntryStore<FilePersistence, SystemClock> {
    /// Open the journal in the configured data directory and load it
    pub fn open_with_config(config: &Config) -> Self {
        let persistence = FilePersistence::new(&config.data_dir, &config.entries_key);
        let mut store = Self::new(persistence, SystemClock);
        store.load();
        store
    }
}

impl<P: Persistence, C: Clock> EntryStore<P, C> {
    /// Create an empty store. Call [`load`](Self::load) to read persisted entries.
    pub fn new(persistence: P, clock: C) -> Self {
        Self {
            entries: Vec::new(),
            session: EditSession::Idle,
            persistence,
            clock,
            last_saved: None,
        }
    }

    /// Replace the in-memory state with whatever is persisted
    ///
    /// A missing, unreadable or malformed blob yields an empty journal; this
    /// never fails. Unusable records are skipped, and repeated ids keep their
    /// first occurrence. Whenever anything is dropped the stored blob is first
    /// handed to [`Persistence::preserve_corrupt`].
    pub fn load(&mut self) -> &[Entry] {
        let blob = match self.persistence.get() {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "could not read stored entries, starting empty");
                None
            }
        };

        let mut entries = match blob {
            None => Vec::new(),
            Some(bytes) => match codec::decode(&bytes) {
                Ok(decoded) => {
                    if decoded.skipped > 0 {
                        warn!(skipped = decoded.skipped, "ignored unusable stored records");
                        self.keep_backup();
                    }
                    decoded.entries
                }
                Err(e) => {
                    warn!(error = %e, "stored entries are malformed, starting empty");
                    self.keep_backup();
                    Vec::new()
                }
            },
        };

        let mut seen = HashSet::new();
        let before = entries.len();
        entries.retain(|entry| {
            let fresh = seen.insert(entry.id.clone());
            if !fresh {
                warn!(id = %entry.id, "dropping duplicate stored entry");
            }
            fresh
        });
        if entries.len() < before {
            self.keep_backup();
        }
        sort_newest_first(&mut entries);

        debug!(count = entries.len(), "entries loaded");
        self.entries = entries;
        &self.entries
    }

    /// Add a new entry at the front of the journal
    pub fn add(&mut self, text: &str, mood: &str) -> Result<Entry, EntryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EntryError::Validation);
        }

        let now = self.clock.now_millis();
        let entry = Entry::new(self.fresh_id(now), text, mood.trim(), now);
        self.entries.insert(0, entry.clone());
        debug!(id = %entry.id, "entry added");

        self.persist();
        Ok(entry)
    }

    /// Replace an entry's text and mood and move it to the front
    ///
    /// `created_at` is left as it was.
    pub fn update(&mut self, id: &str, text: &str, mood: &str) -> Result<Entry, EntryError> {
        let position = self
            .position(id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(EntryError::Validation);
        }

        let mut entry = self.entries.remove(position);
        entry.text = text.to_string();
        entry.mood = mood.trim().to_string();
        self.entries.insert(0, entry.clone());
        debug!(id = %entry.id, from = position, "entry updated");

        self.persist();
        Ok(entry)
    }

    /// Delete an entry. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) {
        let Some(position) = self.position(id) else {
            debug!(id, "remove ignored, no such entry");
            return;
        };

        self.entries.remove(position);
        debug!(id, "entry removed");
        self.persist();
    }

    /// Merge imported candidates into the journal
    ///
    /// Missing fields are filled in (fresh id, current time, empty text).
    /// A candidate whose id is already present is skipped; the existing entry
    /// is never overwritten. The result is re-sorted newest first and
    /// written once.
    pub fn import_merge<I>(&mut self, candidates: I) -> ImportSummary
    where
        I: IntoIterator<Item = PartialEntry>,
    {
        let now = self.clock.now_millis();
        let mut summary = ImportSummary::default();

        for candidate in candidates {
            let id = match candidate.id {
                Some(id) => id,
                None => self.fresh_id(now),
            };
            if self.position(&id).is_some() {
                debug!(id = %id, "import skipped existing entry");
                summary.skipped += 1;
                continue;
            }

            self.entries.push(Entry {
                id,
                text: candidate.text.unwrap_or_default(),
                mood: candidate.mood.unwrap_or_default(),
                created_at: candidate.created_at.unwrap_or(now),
                extra: candidate.extra,
            });
            summary.added += 1;
        }

        sort_newest_first(&mut self.entries);
        info!(
            added = summary.added,
            skipped = summary.skipped,
            "import merged"
        );

        self.persist();
        summary
    }

    /// Current entries in presentation order
    pub fn snapshot(&self) -> &[Entry] {
        &self.entries
    }

    /// Look up an entry by id
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ==================== Edit Session ====================

    /// Start editing an entry, returning a copy for the input buffer
    pub fn begin_edit(&mut self, id: &str) -> Result<Entry, EntryError> {
        let entry = self
            .get(id)
            .cloned()
            .ok_or_else(|| EntryError::NotFound(id.to_string()))?;
        self.session = EditSession::Editing(entry.id.clone());
        Ok(entry)
    }

    /// Save the input buffer
    ///
    /// When idle this adds a new entry. When editing it updates the entry
    /// being edited and returns to idle. If that entry has been removed in
    /// the meantime, the session is reset and `Ok(None)` is returned without
    /// touching the journal. A validation failure leaves the session as is.
    pub fn save_edit(&mut self, text: &str, mood: &str) -> Result<Option<Entry>, EntryError> {
        let id = match &self.session {
            EditSession::Idle => return self.add(text, mood).map(Some),
            EditSession::Editing(id) => id.clone(),
        };

        if self.position(&id).is_none() {
            warn!(id = %id, "entry being edited no longer exists");
            self.session = EditSession::Idle;
            return Ok(None);
        }

        let entry = self.update(&id, text, mood)?;
        self.session = EditSession::Idle;
        Ok(Some(entry))
    }

    /// Abandon the current edit, if any
    pub fn cancel_edit(&mut self) {
        self.session = EditSession::Idle;
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    // ==================== Persistence ====================

    /// Time of the last successful write, in milliseconds since the epoch
    pub fn last_saved(&self) -> Option<i64> {
        self.last_saved
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Write the current entries. Failures are logged, never raised.
    fn persist(&mut self) {
        let blob = match codec::encode(&self.entries) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "could not encode entries, not saved");
                return;
            }
        };

        match self.persistence.put(&blob) {
            Ok(()) => self.last_saved = Some(self.clock.now_millis()),
            Err(e) => warn!(
                error = %e,
                suggestion = e.recovery_suggestion().unwrap_or(""),
                "could not save entries, changes are kept in memory"
            ),
        }
    }

    /// Copy the stored blob aside before a write can drop what failed to decode
    fn keep_backup(&mut self) {
        match self.persistence.preserve_corrupt() {
            Ok(Some(backup)) => {
                info!(backup = %backup.display(), "kept a copy of the stored blob")
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not back up stored blob"),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Time-based id with a random suffix, re-rolled until unused
    fn fresh_id(&self, now: i64) -> String {
        loop {
            let suffix = Uuid::new_v4().simple().to_string();
            let id = format!("{}-{}", now, &suffix[..8]);
            if self.position(&id).is_none() {
                return id;
            }
        }
    }
}

/// Stable sort by `created_at`, newest first
fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

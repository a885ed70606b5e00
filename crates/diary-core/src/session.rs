//! Edit session state
//!
//! One shared input buffer serves both "write a new entry" and "edit an
//! existing entry". The session records which of the two a save means.

/// Which entry, if any, the input buffer is editing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    /// Saving creates a new entry
    #[default]
    Idle,
    /// Saving updates the entry with this id
    Editing(String),
}

impl EditSession {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing(_))
    }

    /// Id of the entry being edited
    pub fn editing_id(&self) -> Option<&str> {
        match self {
            EditSession::Editing(id) => Some(id),
            EditSession::Idle => None,
        }
    }
}

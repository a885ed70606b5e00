//! Errors raised by entry and profile operations
//!
//! Every kind here is recoverable: the operation is not applied and the
//! caller reports the message to the user.

use thiserror::Error;

/// Errors that can occur during entry store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// Required text was empty after trimming
    #[error("Entry text cannot be empty")]
    Validation,

    /// No entry with this id exists
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Import payload or persisted data could not be understood
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

/// Errors that can occur while editing the profile form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Unknown profile field: {0}")]
    UnknownField(String),

    #[error("Field '{key}' is a {expected} field")]
    WrongKind { key: String, expected: &'static str },

    #[error("Invalid value for '{key}': {details}")]
    InvalidValue { key: String, details: String },

    #[error("Cannot add an empty item to '{0}'")]
    EmptyItem(String),

    #[error("Malformed profile: {0}")]
    Malformed(String),
}

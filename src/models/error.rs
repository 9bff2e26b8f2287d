//! Errors raised by edit-session operations.

use crate::models::player::RecordField;

/// Errors that can occur while driving an edit session.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EditError {
    /// The session is not in a mode that allows this action.
    #[error("Invalid state for this action")]
    InvalidState,
    /// A save is already in flight.
    #[error("A save is already in progress")]
    SaveInProgress,
    /// Row index past the end of the staged list.
    #[error("No player at position {0}")]
    NoSuchRow(usize),
    /// Input could not be read as a number.
    #[error("'{value}' is not a number for {field}")]
    NotNumeric { field: RecordField, value: String },
    /// Input parsed but does not fit the field (e.g. negative wins).
    #[error("{value} is out of range for {field}")]
    OutOfRange { field: RecordField, value: i64 },
    /// Submitted secret did not match.
    #[error("Incorrect password, please try again.")]
    WrongPassword,
    /// No edit secret configured on the server.
    #[error("Server misconfigured. No password set.")]
    Misconfigured,
    /// The document store rejected or failed the bulk overwrite.
    #[error("Failed to save changes: {0}")]
    SaveFailed(String),
    /// The document store is missing its id or key.
    #[error("Failed to save changes: {0}")]
    StoreMisconfigured(String),
}

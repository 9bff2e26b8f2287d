//! Edit session: read-only view, password prompt, batch editing and saving.
//!
//! Viewing -> PasswordPrompt (begin_edit)
//! PasswordPrompt -> Editing (correct secret) | PasswordPrompt (wrong secret) | Viewing (cancel)
//! Editing -> Viewing (cancel) | Saving (begin_commit)
//! Saving -> Viewing (write ok) | Editing (write failed, edits kept)
//!
//! Edits go to a staged copy of the displayed rows and are written back as one
//! full-list overwrite. Rows are addressed by position in the staged list.

use crate::logic::access::{AccessGate, AccessVerdict};
use crate::logic::ranking::rank_players;
use crate::models::{EditError, PlayerRecord, RecordField};
use crate::store::{DocumentStore, StoreError};

/// Current mode of an edit session. Staged rows live inside the mode that owns them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EditMode {
    Viewing,
    PasswordPrompt { error: Option<String> },
    Editing { staged: Vec<PlayerRecord> },
    /// Bulk write in flight. No further edits or saves until it resolves.
    Saving { staged: Vec<PlayerRecord> },
}

impl EditMode {
    pub fn name(&self) -> &'static str {
        match self {
            EditMode::Viewing => "viewing",
            EditMode::PasswordPrompt { .. } => "password_prompt",
            EditMode::Editing { .. } => "editing",
            EditMode::Saving { .. } => "saving",
        }
    }
}

/// Displayed leaderboard plus the edit state machine around it.
#[derive(Clone, Debug)]
pub struct EditSession {
    displayed: Vec<PlayerRecord>,
    mode: EditMode,
}

impl EditSession {
    /// Start in Viewing with `records` (stored order) ranked for display.
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        Self {
            displayed: rank_players(&records),
            mode: EditMode::Viewing,
        }
    }

    /// Committed rows, in display order.
    pub fn displayed(&self) -> &[PlayerRecord] {
        &self.displayed
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// Staged rows while editing or saving.
    pub fn staged(&self) -> Option<&[PlayerRecord]> {
        match &self.mode {
            EditMode::Editing { staged } | EditMode::Saving { staged } => Some(staged.as_slice()),
            _ => None,
        }
    }

    /// Rows the page should show: staged while editing, committed otherwise.
    pub fn visible_rows(&self) -> &[PlayerRecord] {
        self.staged().unwrap_or(self.displayed.as_slice())
    }

    pub fn prompt_error(&self) -> Option<&str> {
        match &self.mode {
            EditMode::PasswordPrompt { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.mode, EditMode::Saving { .. })
    }

    /// Open the password prompt. Re-opening an open prompt clears its error.
    pub fn begin_edit(&mut self) -> Result<(), EditError> {
        match self.mode {
            EditMode::Viewing | EditMode::PasswordPrompt { .. } => {
                self.mode = EditMode::PasswordPrompt { error: None };
                Ok(())
            }
            _ => Err(EditError::InvalidState),
        }
    }

    /// Check `candidate` against the gate. On success the staged copy is a fresh clone
    /// of the displayed rows; on failure the prompt stays open with an error.
    pub fn submit_password(&mut self, gate: &AccessGate, candidate: &str) -> Result<(), EditError> {
        if !matches!(self.mode, EditMode::PasswordPrompt { .. }) {
            return Err(EditError::InvalidState);
        }
        let failure = match gate.check(candidate) {
            AccessVerdict::Allow => {
                self.mode = EditMode::Editing {
                    staged: self.displayed.clone(),
                };
                return Ok(());
            }
            AccessVerdict::Deny => EditError::WrongPassword,
            AccessVerdict::Misconfigured => {
                log::error!("Edit requested but no edit password is configured");
                EditError::Misconfigured
            }
        };
        self.mode = EditMode::PasswordPrompt {
            error: Some(failure.to_string()),
        };
        Err(failure)
    }

    /// Close the prompt or drop staged edits. No write is performed.
    pub fn cancel(&mut self) -> Result<(), EditError> {
        match self.mode {
            EditMode::Saving { .. } => Err(EditError::SaveInProgress),
            _ => {
                self.mode = EditMode::Viewing;
                Ok(())
            }
        }
    }

    /// Set one field of one staged row from raw user input. Returns the stored value.
    /// Nothing changes on error.
    pub fn stage_field(&mut self, index: usize, field: RecordField, raw: &str) -> Result<i64, EditError> {
        let staged = match &mut self.mode {
            EditMode::Editing { staged } => staged,
            EditMode::Saving { .. } => return Err(EditError::SaveInProgress),
            _ => return Err(EditError::InvalidState),
        };
        let row = staged.get_mut(index).ok_or(EditError::NoSuchRow(index))?;
        let value = coerce_field_value(field, raw)?;
        apply_field(row, field, value)?;
        log::debug!("Staged {} = {} for row {}", field, value, index);
        Ok(value)
    }

    /// Editing -> Saving. Returns the body for the single bulk overwrite.
    pub fn begin_commit(&mut self) -> Result<Vec<PlayerRecord>, EditError> {
        match std::mem::replace(&mut self.mode, EditMode::Viewing) {
            EditMode::Editing { staged } => {
                let body = staged.clone();
                self.mode = EditMode::Saving { staged };
                Ok(body)
            }
            other => {
                let err = if matches!(other, EditMode::Saving { .. }) {
                    EditError::SaveInProgress
                } else {
                    EditError::InvalidState
                };
                self.mode = other;
                Err(err)
            }
        }
    }

    /// Resolve a save started by `begin_commit`.
    ///
    /// Success: the staged rows become the displayed rows, re-ranked, and the session
    /// returns to Viewing. Failure: back to Editing with the staged rows intact.
    pub fn finish_commit(&mut self, outcome: Result<(), StoreError>) -> Result<(), EditError> {
        let staged = match std::mem::replace(&mut self.mode, EditMode::Viewing) {
            EditMode::Saving { staged } => staged,
            other => {
                self.mode = other;
                return Err(EditError::InvalidState);
            }
        };
        match outcome {
            Ok(()) => {
                self.displayed = rank_players(&staged);
                Ok(())
            }
            Err(e) => {
                log::warn!("Saving leaderboard failed: {}", e);
                let err = if e.is_misconfigured() {
                    EditError::StoreMisconfigured(e.to_string())
                } else {
                    EditError::SaveFailed(e.to_string())
                };
                self.mode = EditMode::Editing { staged };
                Err(err)
            }
        }
    }

    /// Write the staged rows with exactly one `overwrite` call and resolve the save.
    pub async fn commit(&mut self, store: &dyn DocumentStore) -> Result<(), EditError> {
        let body = self.begin_commit()?;
        let outcome = store.overwrite(&body).await;
        self.finish_commit(outcome)
    }
}

/// Read user input as a field value.
///
/// Blank input is 0 (a cleared number box). Decimals truncate toward zero.
/// Counters (wins/losses/ties) must be within 0..=u32::MAX.
pub fn coerce_field_value(field: RecordField, raw: &str) -> Result<i64, EditError> {
    let trimmed = raw.trim();
    let not_numeric = || EditError::NotNumeric {
        field,
        value: raw.to_string(),
    };
    let value = if trimmed.is_empty() {
        0
    } else if let Ok(n) = trimmed.parse::<i64>() {
        n
    } else {
        match trimmed.parse::<f64>() {
            // Stay inside the range where f64 holds integers exactly.
            Ok(f) if f.is_finite() && f.abs() < 9.0e15 => f.trunc() as i64,
            _ => return Err(not_numeric()),
        }
    };
    if field.is_count() && u32::try_from(value).is_err() {
        return Err(EditError::OutOfRange { field, value });
    }
    Ok(value)
}

fn apply_field(row: &mut PlayerRecord, field: RecordField, value: i64) -> Result<(), EditError> {
    let count = || u32::try_from(value).map_err(|_| EditError::OutOfRange { field, value });
    match field {
        RecordField::Wins => row.wins = count()?,
        RecordField::Losses => row.losses = count()?,
        RecordField::Ties => row.ties = Some(count()?),
        RecordField::Points => row.points = value,
    }
    Ok(())
}

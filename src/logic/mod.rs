//! Leaderboard business logic: ranking, edit sessions, access gate.

mod access;
mod edit_session;
mod ranking;

pub use access::{AccessGate, AccessVerdict};
pub use edit_session::{coerce_field_value, EditMode, EditSession};
pub use ranking::{compare_players, rank_players, win_loss_ratio};

//! Data structures for the leaderboard: player records and edit errors.

mod error;
mod player;

pub use error::EditError;
pub use player::{PlayerRecord, RecordField};

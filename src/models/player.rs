//! PlayerRecord and RecordField data structures.

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the leaderboard document.
///
/// There is no id: a record is addressed by its position in the list it lives in.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Display label (not unique).
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub wins: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub losses: u32,
    /// Absent in documents written without a ties column; kept absent on write-back.
    #[serde(
        default,
        deserialize_with = "lenient_optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub ties: Option<u32>,
    /// Total points (may be negative).
    #[serde(default, deserialize_with = "lenient_points")]
    pub points: i64,
}

impl PlayerRecord {
    /// Create a record with the given name. Counters start at zero, ties absent.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper for setting wins/losses/points at once.
    pub fn with_record(mut self, wins: u32, losses: u32, points: i64) -> Self {
        self.wins = wins;
        self.losses = losses;
        self.points = points;
        self
    }

    /// Builder-style helper for the ties column.
    pub fn with_ties(mut self, ties: u32) -> Self {
        self.ties = Some(ties);
        self
    }
}

/// Editable numeric column of a PlayerRecord. The name is not editable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Wins,
    Losses,
    Ties,
    Points,
}

impl RecordField {
    /// Counter fields (wins/losses/ties) cannot go below zero.
    pub fn is_count(self) -> bool {
        !matches!(self, RecordField::Points)
    }
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordField::Wins => "wins",
            RecordField::Losses => "losses",
            RecordField::Ties => "ties",
            RecordField::Points => "points",
        };
        f.write_str(s)
    }
}

// Older page versions wrote `null` (a NaN from a bad number input) or decimals
// into the document. Read those as numbers instead of rejecting the whole list.

fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.map(to_count).unwrap_or(0))
}

fn lenient_optional_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.map(to_count))
}

fn lenient_points<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64)
        .unwrap_or(0))
}

fn to_count(n: f64) -> u32 {
    if n.is_finite() && n > 0.0 {
        n.trunc() as u32
    } else {
        0
    }
}

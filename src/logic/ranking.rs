//! Leaderboard ordering: win/loss ratio descending, then points descending.

use crate::models::PlayerRecord;
use std::cmp::Ordering;

/// Wins divided by losses. A player with no losses has ratio 0, not infinity.
pub fn win_loss_ratio(player: &PlayerRecord) -> f64 {
    if player.losses == 0 {
        0.0
    } else {
        f64::from(player.wins) / f64::from(player.losses)
    }
}

/// Leaderboard order between two records (Less = ranked higher).
pub fn compare_players(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    win_loss_ratio(b)
        .total_cmp(&win_loss_ratio(a))
        .then_with(|| b.points.cmp(&a.points))
}

/// Return a ranked copy of `players`. Equal ratio and points keep their input order.
pub fn rank_players(players: &[PlayerRecord]) -> Vec<PlayerRecord> {
    let mut ranked = players.to_vec();
    ranked.sort_by(compare_players);
    ranked
}

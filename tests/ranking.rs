//! Integration tests for leaderboard ordering.

use league_leaderboard::{rank_players, win_loss_ratio, PlayerRecord};

fn p(name: &str, wins: u32, losses: u32, points: i64) -> PlayerRecord {
    PlayerRecord::new(name).with_record(wins, losses, points)
}

#[test]
fn undefeated_player_ranks_as_ratio_zero() {
    let input = vec![p("ThreeOh", 3, 0, 5), p("OneOne", 1, 1, 9)];
    let ranked = rank_players(&input);
    assert_eq!(ranked[0].name, "OneOne");
    assert_eq!(ranked[1].name, "ThreeOh");
}

#[test]
fn ratio_descending_then_points_descending() {
    let input = vec![
        p("Half", 1, 2, 100),
        p("Double", 4, 2, 0),
        p("EvenLow", 2, 2, 1),
        p("EvenHigh", 3, 3, 50),
    ];
    let names: Vec<_> = rank_players(&input).into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["Double", "EvenHigh", "EvenLow", "Half"]);
}

#[test]
fn negative_points_sort_below_zero() {
    let input = vec![p("Neg", 0, 1, -5), p("Zero", 0, 1, 0)];
    let ranked = rank_players(&input);
    assert_eq!(ranked[0].name, "Zero");
}

#[test]
fn full_ties_keep_input_order_and_all_records() {
    let a = p("A", 0, 0, 0);
    let b = p("B", 0, 0, 0);
    let ranked = rank_players(&[a.clone(), b.clone()]);
    assert_eq!(ranked, vec![a, b]);
}

#[test]
fn ranking_does_not_touch_input() {
    let input = vec![p("Low", 0, 3, 0), p("High", 3, 1, 0)];
    let before = input.clone();
    let _ = rank_players(&input);
    assert_eq!(input, before);
}

#[test]
fn ratio_uses_wins_over_losses() {
    assert_eq!(win_loss_ratio(&p("X", 3, 2, 0)), 1.5);
    assert_eq!(win_loss_ratio(&p("Y", 0, 0, 0)), 0.0);
}

#[test]
fn empty_list_ranks_to_empty() {
    assert!(rank_players(&[]).is_empty());
}

// Scaled per-game metrics: game score, weighted game score, dominance.
//
// All three take the same unit list and are independent of one another.

use super::placement::placement_groups;
use super::{broadcast, individual_units, round2, DominanceMap, ScaledScores, Unit};
use crate::session::EntrantScore;

/// Score given to every unit when there is nothing to scale against.
const FULL_SCORE: u32 = 100;

// ---------------------------------------------------------------------------
// Game score (placement based)
// ---------------------------------------------------------------------------

/// Placement-based 0..=100 score.
///
/// With `n` units there are `n - 1` slots below first place. A placement
/// group scores `round((1 - used / slots) * 100)`, where `used` counts the
/// units placed ahead of the group. Best group is 100; without ties the
/// worst is 0. A lone unit scores 100.
pub fn game_score_units(units: &[Unit]) -> ScaledScores {
    let n = units.len();
    if n == 0 {
        return ScaledScores::new();
    }
    if n == 1 {
        return broadcast(units, |_| FULL_SCORE);
    }

    let slot_count = (n - 1) as f64;
    let mut score_of = vec![0u32; n];
    let mut used_ranks = 0usize;
    for group in placement_groups(units) {
        let score = ((1.0 - used_ranks as f64 / slot_count) * 100.0).round() as u32;
        for &idx in &group.units {
            score_of[idx] = score;
        }
        used_ranks += group.units.len();
    }
    broadcast(units, |idx| score_of[idx])
}

/// Placement-based game score, entrants ranked individually.
pub fn game_score(entrants: &[EntrantScore]) -> ScaledScores {
    game_score_units(&individual_units(entrants))
}

// ---------------------------------------------------------------------------
// Weighted game score (min-max)
// ---------------------------------------------------------------------------

/// Min-max normalized 0..=100 score. When every unit has the same score
/// (including a single unit) everyone gets 100.
///
/// Differences are taken in `i128`, so any pair of `i64` scores is in range.
pub fn weighted_game_score_units(units: &[Unit]) -> ScaledScores {
    let (Some(min), Some(max)) = (
        units.iter().map(|u| u.score).min(),
        units.iter().map(|u| u.score).max(),
    ) else {
        return ScaledScores::new();
    };

    if max == min {
        return broadcast(units, |_| FULL_SCORE);
    }

    let min = i128::from(min);
    let range = (i128::from(max) - min) as f64;
    broadcast(units, |idx| {
        (((i128::from(units[idx].score) - min) as f64 / range) * 100.0).round() as u32
    })
}

/// Min-max weighted game score, entrants ranked individually.
pub fn weighted_game_score(entrants: &[EntrantScore]) -> ScaledScores {
    weighted_game_score_units(&individual_units(entrants))
}

// ---------------------------------------------------------------------------
// Dominance (share of total)
// ---------------------------------------------------------------------------

/// Each unit's share of the summed score, as a percentage rounded to 2dp.
/// A zero total gives everyone 0. The total is summed in `i128`.
pub fn dominance_units(units: &[Unit]) -> DominanceMap {
    let total: i128 = units.iter().map(|u| i128::from(u.score)).sum();
    if total == 0 {
        return broadcast(units, |_| 0.0);
    }
    let total = total as f64;
    broadcast(units, |idx| round2(units[idx].score as f64 / total * 100.0))
}

/// Dominance, entrants counted individually.
pub fn dominance(entrants: &[EntrantScore]) -> DominanceMap {
    dominance_units(&individual_units(entrants))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrants(scores: &[(&str, i64)]) -> Vec<EntrantScore> {
        scores.iter().map(|&(n, s)| EntrantScore::new(n, s)).collect()
    }

    // ---- game score ----

    #[test]
    fn game_score_with_tied_winners() {
        let scores = game_score(&entrants(&[("A", 10), ("B", 10), ("C", 5)]));
        assert_eq!(scores["A"], 100);
        assert_eq!(scores["B"], 100);
        assert_eq!(scores["C"], 0);
    }

    #[test]
    fn game_score_without_ties_spans_full_range() {
        let scores = game_score(&entrants(&[("A", 40), ("B", 30), ("C", 20), ("D", 10)]));
        assert_eq!(scores["A"], 100);
        assert_eq!(scores["B"], 67);
        assert_eq!(scores["C"], 33);
        assert_eq!(scores["D"], 0);
    }

    #[test]
    fn game_score_tied_losers_share_middle() {
        // slots = 3; A used 0 -> 100; B, C used 1 -> 67; D used 3 -> 0
        let scores = game_score(&entrants(&[("A", 9), ("B", 5), ("C", 5), ("D", 1)]));
        assert_eq!(scores["A"], 100);
        assert_eq!(scores["B"], 67);
        assert_eq!(scores["C"], 67);
        assert_eq!(scores["D"], 0);
    }

    #[test]
    fn game_score_tied_last_place_is_not_zero() {
        // slots = 2; A used 0 -> 100; B, C used 1 -> 50
        let scores = game_score(&entrants(&[("A", 9), ("B", 1), ("C", 1)]));
        assert_eq!(scores["B"], 50);
        assert_eq!(scores["C"], 50);
    }

    #[test]
    fn game_score_all_tied_is_all_100() {
        let scores = game_score(&entrants(&[("A", 3), ("B", 3), ("C", 3)]));
        assert!(scores.values().all(|&s| s == 100));
    }

    #[test]
    fn game_score_single_entrant() {
        assert_eq!(game_score(&entrants(&[("A", 7)]))["A"], 100);
    }

    #[test]
    fn game_score_empty() {
        assert!(game_score(&[]).is_empty());
    }

    // ---- weighted game score ----

    #[test]
    fn weighted_min_max() {
        let scores = weighted_game_score(&entrants(&[("A", 10), ("B", 5), ("C", 0), ("D", 7)]));
        assert_eq!(scores["A"], 100);
        assert_eq!(scores["B"], 50);
        assert_eq!(scores["C"], 0);
        assert_eq!(scores["D"], 70);
    }

    #[test]
    fn weighted_rounds_to_nearest() {
        // (1 - 0) / (3 - 0) * 100 = 33.3 -> 33; 2/3 -> 66.7 -> 67
        let scores = weighted_game_score(&entrants(&[("A", 0), ("B", 1), ("C", 2), ("D", 3)]));
        assert_eq!(scores["B"], 33);
        assert_eq!(scores["C"], 67);
    }

    #[test]
    fn weighted_all_equal_is_100() {
        let scores = weighted_game_score(&entrants(&[("A", 5), ("B", 5)]));
        assert_eq!(scores["A"], 100);
        assert_eq!(scores["B"], 100);
    }

    #[test]
    fn weighted_with_negative_scores() {
        let scores = weighted_game_score(&entrants(&[("A", -10), ("B", 0), ("C", 10)]));
        assert_eq!(scores["A"], 0);
        assert_eq!(scores["B"], 50);
        assert_eq!(scores["C"], 100);
    }

    #[test]
    fn weighted_spans_the_full_i64_range() {
        let scores = weighted_game_score(&entrants(&[("A", i64::MAX), ("B", -1), ("C", i64::MIN)]));
        assert_eq!(scores["A"], 100);
        assert_eq!(scores["B"], 50);
        assert_eq!(scores["C"], 0);
    }

    #[test]
    fn weighted_single_and_empty() {
        assert_eq!(weighted_game_score(&entrants(&[("A", 7)]))["A"], 100);
        assert!(weighted_game_score(&[]).is_empty());
    }

    // ---- dominance ----

    #[test]
    fn dominance_is_share_of_total() {
        let dom = dominance(&entrants(&[("A", 1), ("B", 2)]));
        assert_eq!(dom["A"], 33.33);
        assert_eq!(dom["B"], 66.67);
    }

    #[test]
    fn dominance_all_equal_splits_evenly() {
        let dom = dominance(&entrants(&[("A", 5), ("B", 5)]));
        assert_eq!(dom["A"], 50.0);
        assert_eq!(dom["B"], 50.0);
    }

    #[test]
    fn dominance_zero_total_is_zero() {
        let dom = dominance(&entrants(&[("A", 0), ("B", 0)]));
        assert_eq!(dom["A"], 0.0);
        assert_eq!(dom["B"], 0.0);
    }

    #[test]
    fn dominance_single_entrant_is_100() {
        assert_eq!(dominance(&entrants(&[("A", 7)]))["A"], 100.0);
    }

    #[test]
    fn dominance_with_extreme_scores() {
        let dom = dominance(&entrants(&[("A", i64::MAX), ("B", 1)]));
        assert_eq!(dom["A"], 100.0);
        assert_eq!(dom["B"], 0.0);

        let dom = dominance(&entrants(&[("A", i64::MAX), ("B", i64::MAX)]));
        assert_eq!(dom["A"], 50.0);
        assert_eq!(dom["B"], 50.0);

        let dom = dominance(&entrants(&[("A", i64::MIN), ("B", i64::MIN)]));
        assert_eq!(dom["A"], 50.0);
    }

    #[test]
    fn dominance_empty() {
        assert!(dominance(&[]).is_empty());
    }

    #[test]
    fn zero_sum_rule_differs_from_all_equal_rule() {
        let list = entrants(&[("A", 0), ("B", 0)]);
        assert_eq!(weighted_game_score(&list)["A"], 100);
        assert_eq!(dominance(&list)["A"], 0.0);
    }
}

// Per-game scoring: placements, scaled scores, dominance and team handling.
//
// Everything here works on `Unit`s. In an individual game each entrant is
// its own unit; in a team game each team is one unit. Results are keyed by
// player name, so a unit's value is broadcast to all of its members.

pub mod placement;
pub mod scaling;
pub mod team;

use std::collections::HashMap;

use crate::session::EntrantScore;

/// Player name -> placement (1 is best).
pub type Placements = HashMap<String, u32>;

/// Player name -> 0..=100 integer score.
pub type ScaledScores = HashMap<String, u32>;

/// Player name -> share of the game's total points, in percent (2dp).
pub type DominanceMap = HashMap<String, f64>;

/// One ranked competitor: a single entrant or a whole team.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub score: i64,
    pub members: Vec<String>,
}

/// One unit per entrant.
pub fn individual_units(entrants: &[EntrantScore]) -> Vec<Unit> {
    entrants
        .iter()
        .map(|e| Unit {
            score: e.score,
            members: vec![e.name.clone()],
        })
        .collect()
}

/// Copy each unit's value to every member name.
pub(crate) fn broadcast<T: Copy>(units: &[Unit], value_of: impl Fn(usize) -> T) -> HashMap<String, T> {
    let mut out = HashMap::with_capacity(units.iter().map(|u| u.members.len()).sum());
    for (idx, unit) in units.iter().enumerate() {
        let value = value_of(idx);
        for name in &unit.members {
            out.insert(name.clone(), value);
        }
    }
    out
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// All four per-game metrics for one entrant list, team-aware.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameScoring {
    pub placements: Placements,
    pub game_scores: ScaledScores,
    pub weighted_game_scores: ScaledScores,
    pub dominance: DominanceMap,
}

/// Score a single game. Team games are detected automatically and ranked
/// team-by-team; individual games are ranked entrant-by-entrant.
pub fn score_game(entrants: &[EntrantScore]) -> GameScoring {
    let units = team::units_for(entrants);
    GameScoring {
        placements: placement::rank_units(&units),
        game_scores: scaling::game_score_units(&units),
        weighted_game_scores: scaling::weighted_game_score_units(&units),
        dominance: scaling::dominance_units(&units),
    }
}

// Multi-game leaderboard: fold every game through the team-aware scorer and
// reduce each player's running tallies to averages.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::roster::Roster;
use crate::scoring::score_game;
use crate::session::GameSession;

// ---------------------------------------------------------------------------
// Display precision
// ---------------------------------------------------------------------------

pub const PLACEMENT_DECIMALS: u32 = 2;
pub const GAME_SCORE_DECIMALS: u32 = 1;
pub const WEIGHTED_GAME_SCORE_DECIMALS: u32 = 2;
pub const DOMINANCE_DECIMALS: u32 = 2;

/// Rendered in place of an average when the player has no qualifying games.
pub const NO_DATA: &str = "—";

/// Round `value` to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format an average at a fixed precision, or the no-data marker.
pub fn format_average(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals as usize, v),
        None => NO_DATA.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Leaderboard row
// ---------------------------------------------------------------------------

/// One player's aggregated statistics.
///
/// Averages are taken only over games the player appeared in and are
/// already rounded to their display precision. `None` means the player has
/// no qualifying games; it is never reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub name: String,
    pub games_played: u32,
    pub wins: u32,
    pub avg_placement: Option<f64>,
    pub avg_game_score: Option<f64>,
    pub avg_weighted_game_score: Option<f64>,
    pub avg_dominance: Option<f64>,
}

impl LeaderboardRow {
    pub fn avg_placement_display(&self) -> String {
        format_average(self.avg_placement, PLACEMENT_DECIMALS)
    }

    pub fn avg_game_score_display(&self) -> String {
        format_average(self.avg_game_score, GAME_SCORE_DECIMALS)
    }

    pub fn avg_weighted_game_score_display(&self) -> String {
        format_average(self.avg_weighted_game_score, WEIGHTED_GAME_SCORE_DECIMALS)
    }

    pub fn avg_dominance_display(&self) -> String {
        format_average(self.avg_dominance, DOMINANCE_DECIMALS)
    }
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

/// Running totals for one player while games are folded in.
#[derive(Debug, Default)]
struct PlayerTally {
    games_played: u32,
    wins: u32,
    placements: Vec<f64>,
    game_scores: Vec<f64>,
    weighted_game_scores: Vec<f64>,
    /// Per-game shares in whole hundredths, so the sum is exact.
    dominance_hundredths: Vec<i64>,
}

fn mean(values: &[f64], decimals: u32) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    Some(round_to(avg, decimals))
}

fn mean_hundredths(values: &[i64], decimals: u32) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: i128 = values.iter().map(|&v| i128::from(v)).sum();
    let avg = total as f64 / values.len() as f64 / 100.0;
    Some(round_to(avg, decimals))
}

impl PlayerTally {
    fn into_row(self, name: &str) -> LeaderboardRow {
        LeaderboardRow {
            name: name.to_string(),
            games_played: self.games_played,
            wins: self.wins,
            avg_placement: mean(&self.placements, PLACEMENT_DECIMALS),
            avg_game_score: mean(&self.game_scores, GAME_SCORE_DECIMALS),
            avg_weighted_game_score: mean(
                &self.weighted_game_scores,
                WEIGHTED_GAME_SCORE_DECIMALS,
            ),
            avg_dominance: mean_hundredths(&self.dominance_hundredths, DOMINANCE_DECIMALS),
        }
    }
}

/// Build the leaderboard for `roster` from `games`, in default order.
///
/// Steps, per game in input order:
/// 1. Score the game (team-aware placements, game scores, weighted game
///    scores, dominance).
/// 2. For every entrant on the roster, push its values and count the game.
/// 3. Every entrant whose score equals the game's maximum gets a win, so a
///    tie at the top produces several winners.
///
/// Players who sat a game out are untouched by it. Entrants that are not on
/// the roster are skipped.
pub fn build_leaderboard(games: &[GameSession], roster: &Roster) -> Vec<LeaderboardRow> {
    let mut tallies: HashMap<&str, PlayerTally> = roster
        .iter()
        .map(|name| (name, PlayerTally::default()))
        .collect();

    for game in games {
        let scoring = score_game(&game.scores);
        let max_score = game.max_score();
        debug!(
            "Scoring '{}' ({} entrants, team game: {})",
            game.game_name,
            game.scores.len(),
            game.is_team_game
        );

        for entrant in &game.scores {
            let Some(tally) = tallies.get_mut(entrant.name.as_str()) else {
                warn!(
                    "Entrant '{}' in '{}' is not on the roster; skipping",
                    entrant.name, game.game_name
                );
                continue;
            };

            tally.games_played += 1;
            if let Some(&place) = scoring.placements.get(&entrant.name) {
                tally.placements.push(f64::from(place));
            }
            if let Some(&score) = scoring.game_scores.get(&entrant.name) {
                tally.game_scores.push(f64::from(score));
            }
            if let Some(&score) = scoring.weighted_game_scores.get(&entrant.name) {
                tally.weighted_game_scores.push(f64::from(score));
            }
            if let Some(&share) = scoring.dominance.get(&entrant.name) {
                tally.dominance_hundredths.push((share * 100.0).round() as i64);
            }
            if Some(entrant.score) == max_score {
                tally.wins += 1;
            }
        }
    }

    let mut rows: Vec<LeaderboardRow> = roster
        .iter()
        .map(|name| {
            tallies
                .remove(name)
                .unwrap_or_default()
                .into_row(name)
        })
        .collect();

    sort_default(&mut rows);
    rows
}

/// Default leaderboard order: most wins first, then best (lowest) average
/// placement. Players without a placement average go after those with one.
/// Stable, so remaining ties keep roster order.
pub fn sort_default(rows: &mut [LeaderboardRow]) {
    rows.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| compare_placement(a.avg_placement, b.avg_placement))
    });
}

fn compare_placement(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Per-game and per-player views over recorded sessions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scoring::{score_game, GameScoring};
use crate::session::{GameSession, TeamId};

/// One entrant's line in a single game's result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultLine {
    pub name: String,
    pub score: i64,
    pub team: Option<TeamId>,
    pub placement: u32,
    pub game_score: u32,
    pub weighted_game_score: u32,
    pub dominance: f64,
    pub is_win: bool,
}

/// One game as seen from a single player's log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameEntry {
    pub game_name: String,
    pub entered_at: DateTime<Utc>,
    pub score: i64,
    pub team: Option<TeamId>,
    pub placement: u32,
    pub game_score: u32,
    pub weighted_game_score: u32,
    pub dominance: f64,
    pub is_win: bool,
}

fn line_for(
    scoring: &GameScoring,
    max_score: Option<i64>,
    name: &str,
    score: i64,
    team: Option<TeamId>,
) -> GameResultLine {
    GameResultLine {
        name: name.to_string(),
        score,
        team,
        placement: scoring.placements.get(name).copied().unwrap_or_default(),
        game_score: scoring.game_scores.get(name).copied().unwrap_or_default(),
        weighted_game_score: scoring
            .weighted_game_scores
            .get(name)
            .copied()
            .unwrap_or_default(),
        dominance: scoring.dominance.get(name).copied().unwrap_or_default(),
        is_win: Some(score) == max_score,
    }
}

/// Full result table for one session, highest score first. Entrants with
/// equal scores keep their recorded order.
pub fn game_breakdown(session: &GameSession) -> Vec<GameResultLine> {
    let scoring = score_game(&session.scores);
    let max_score = session.max_score();

    let mut lines: Vec<GameResultLine> = session
        .scores
        .iter()
        .map(|e| line_for(&scoring, max_score, &e.name, e.score, e.team))
        .collect();
    lines.sort_by(|a, b| b.score.cmp(&a.score));
    lines
}

/// Every game `player` took part in, in session order.
pub fn player_history(sessions: &[GameSession], player: &str) -> Vec<PlayerGameEntry> {
    sessions
        .iter()
        .filter_map(|session| {
            let entrant = session.entrant(player)?;
            let scoring = score_game(&session.scores);
            let line = line_for(
                &scoring,
                session.max_score(),
                &entrant.name,
                entrant.score,
                entrant.team,
            );
            Some(PlayerGameEntry {
                game_name: session.game_name.clone(),
                entered_at: session.entered_at,
                score: line.score,
                team: line.team,
                placement: line.placement,
                game_score: line.game_score,
                weighted_game_score: line.weighted_game_score,
                dominance: line.dominance,
                is_win: line.is_win,
            })
        })
        .collect()
}

// Session records: one entrant's score and one recorded game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Team identifier within a single game. Team ids are positive; `0` is
/// rejected at ingestion.
pub type TeamId = u32;

/// The team every entrant lands on when a team game is enabled and no
/// explicit assignment was made.
pub const DEFAULT_TEAM: TeamId = 1;

/// One entrant's raw result in a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrantScore {
    /// Player name, unique within the game.
    pub name: String,
    /// Raw points scored. May be negative.
    pub score: i64,
    /// Team the entrant played for, if this was a team game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamId>,
}

impl EntrantScore {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        EntrantScore {
            name: name.into(),
            score,
            team: None,
        }
    }

    pub fn on_team(name: impl Into<String>, score: i64, team: TeamId) -> Self {
        EntrantScore {
            name: name.into(),
            score,
            team: Some(team),
        }
    }
}

/// Whether any entrant in the list carries a team id.
pub fn is_team_game(entrants: &[EntrantScore]) -> bool {
    entrants.iter().any(|e| e.team.is_some())
}

/// A single recorded game.
///
/// `(game_name, entered_at)` identifies a session. Edits replace `scores`
/// and/or `game_name` but never `entered_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub game_name: String,
    pub entered_at: DateTime<Utc>,
    pub scores: Vec<EntrantScore>,
    #[serde(default)]
    pub is_team_game: bool,
    /// Team ids parallel to the roster the game was recorded against.
    /// Kept for reference only; the per-entrant `team` field is what the
    /// engine reads.
    #[serde(default)]
    pub team_assignments: Option<Vec<TeamId>>,
}

impl GameSession {
    /// Build an individual (non-team) session.
    pub fn new(
        game_name: impl Into<String>,
        entered_at: DateTime<Utc>,
        scores: Vec<EntrantScore>,
    ) -> Self {
        let is_team_game = is_team_game(&scores);
        GameSession {
            game_name: game_name.into(),
            entered_at,
            scores,
            is_team_game,
            team_assignments: None,
        }
    }

    /// Highest raw score in the game, or `None` for an empty game.
    pub fn max_score(&self) -> Option<i64> {
        self.scores.iter().map(|s| s.score).max()
    }

    /// Look up one entrant by name.
    pub fn entrant(&self, name: &str) -> Option<&EntrantScore> {
        self.scores.iter().find(|s| s.name == name)
    }

    /// In a team game, put every entrant without a team on `DEFAULT_TEAM`
    /// and set the team flag. Sessions where nobody has a team are left
    /// alone.
    pub fn resolve_default_teams(&mut self) {
        if !is_team_game(&self.scores) {
            return;
        }
        for entrant in &mut self.scores {
            entrant.team.get_or_insert(DEFAULT_TEAM);
        }
        self.is_team_game = true;
    }

    /// Whether `other` is the same recorded session (same name and timestamp).
    pub fn same_session(&self, other: &GameSession) -> bool {
        self.game_name == other.game_name && self.entered_at == other.entered_at
    }
}

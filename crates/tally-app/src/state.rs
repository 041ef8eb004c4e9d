// Application state: roster, recorded games, and the in-progress entry and
// edit forms. Every user action is one transition through `reduce`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tally_core::leaderboard::{build_leaderboard, LeaderboardRow};
use tally_core::roster::Roster;
use tally_core::session::{EntrantScore, GameSession, TeamId, DEFAULT_TEAM};
use tally_core::sort::{sort_by, SortColumn, SortState};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, EntryLimits};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an action was refused. A refused action leaves the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("player name must not be blank")]
    BlankPlayerName,

    #[error("'{name}' is already on the roster")]
    DuplicatePlayer { name: String },

    #[error("need at least 2 players to start a game, have {count}")]
    NotEnoughPlayers { count: usize },

    #[error("a game is already being entered")]
    GameInProgress,

    #[error("no game is being entered")]
    NoGameInProgress,

    #[error("entrant #{index} does not exist ({len} entrants)")]
    EntrantOutOfRange { index: usize, len: usize },

    #[error("team {team} is out of range (1..={max})")]
    TeamOutOfRange { team: TeamId, max: u32 },

    #[error("teams can only be assigned in a team game")]
    NotATeamGame,

    #[error("game name must not be blank")]
    BlankGameName,

    #[error("game name is {len} characters; the limit is {max}")]
    GameNameTooLong { len: usize, max: usize },

    #[error("at least one entrant must be playing")]
    NoActiveEntrants,

    #[error("game #{index} does not exist ({len} games)")]
    SessionOutOfRange { index: usize, len: usize },

    #[error("no game is being edited")]
    NotEditing,

    #[error("a loaded log must contain at least one game")]
    EmptyLog,
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// One roster player's row in the game-entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub name: String,
    pub score: i64,
    /// Inactive players sat the game out and are not saved.
    pub active: bool,
}

/// A game being entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDraft {
    pub game_name: String,
    pub entries: Vec<DraftEntry>,
    pub is_team_game: bool,
    /// Team per entry, parallel to `entries`. Empty unless `is_team_game`.
    pub team_assignments: Vec<TeamId>,
}

/// A recorded game being corrected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDraft {
    /// Index into `AppState::sessions`.
    pub index: usize,
    pub game_name: String,
    pub scores: Vec<EntrantScore>,
}

// ---------------------------------------------------------------------------
// State and actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub roster: Roster,
    pub sessions: Vec<GameSession>,
    pub draft: Option<GameDraft>,
    pub editing: Option<EditDraft>,
    pub sort: SortState,
    pub limits: EntryLimits,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            roster: Roster::new(),
            sessions: Vec::new(),
            draft: None,
            editing: None,
            sort: SortState::default(),
            limits: EntryLimits::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddPlayer(String),
    StartGame,
    SetGameName(String),
    SetScore { index: usize, score: i64 },
    SetActive { index: usize, active: bool },
    SetTeamGame(bool),
    AssignTeam { index: usize, team: TeamId },
    SubmitGame { entered_at: chrono::DateTime<chrono::Utc> },
    StartEdit(usize),
    EditScore { index: usize, score: i64 },
    EditGameName(String),
    SaveEdit,
    CancelEdit,
    LoadLog(Vec<GameSession>),
    SortBy(SortColumn),
}

impl AppState {
    /// Starting state from configuration and any previously saved games.
    /// Players seen in `sessions` but missing from the configured roster are
    /// appended after it.
    pub fn from_config(config: &Config, sessions: Vec<GameSession>) -> Self {
        let mut roster = config.roster.clone();
        for name in Roster::from_sessions(&sessions).iter() {
            roster.add(name);
        }
        AppState {
            roster,
            sessions,
            sort: config.sort,
            limits: config.entry,
            ..AppState::default()
        }
    }

    /// Leaderboard rows in the current display order.
    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        let rows = build_leaderboard(&self.sessions, &self.roster);
        sort_by(&rows, self.sort.column, self.sort.direction)
    }
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Apply `action` to `state`, returning the next state. `state` is never
/// modified; on error the caller keeps it as is.
pub fn reduce(state: &AppState, action: Action) -> Result<AppState, ActionError> {
    let mut next = state.clone();
    debug!("Applying {:?}", action);

    match action {
        Action::AddPlayer(name) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(ActionError::BlankPlayerName);
            }
            if !next.roster.add(name) {
                return Err(ActionError::DuplicatePlayer { name: name.into() });
            }
            info!("Added player '{}'", name);
        }

        Action::StartGame => {
            if next.draft.is_some() {
                return Err(ActionError::GameInProgress);
            }
            if next.roster.len() < 2 {
                return Err(ActionError::NotEnoughPlayers {
                    count: next.roster.len(),
                });
            }
            next.draft = Some(GameDraft {
                game_name: String::new(),
                entries: next
                    .roster
                    .iter()
                    .map(|name| DraftEntry {
                        name: name.to_string(),
                        score: 0,
                        active: true,
                    })
                    .collect(),
                is_team_game: false,
                team_assignments: Vec::new(),
            });
        }

        Action::SetGameName(name) => {
            draft_mut(&mut next)?.game_name = name;
        }

        Action::SetScore { index, score } => {
            entry_mut(draft_mut(&mut next)?, index)?.score = score;
        }

        Action::SetActive { index, active } => {
            entry_mut(draft_mut(&mut next)?, index)?.active = active;
        }

        Action::SetTeamGame(enabled) => {
            let draft = draft_mut(&mut next)?;
            draft.is_team_game = enabled;
            draft.team_assignments = if enabled {
                vec![DEFAULT_TEAM; draft.entries.len()]
            } else {
                Vec::new()
            };
        }

        Action::AssignTeam { index, team } => {
            let max = next.limits.max_teams;
            let draft = draft_mut(&mut next)?;
            if !draft.is_team_game {
                return Err(ActionError::NotATeamGame);
            }
            if team == 0 || team > max {
                return Err(ActionError::TeamOutOfRange { team, max });
            }
            let len = draft.team_assignments.len();
            let slot = draft
                .team_assignments
                .get_mut(index)
                .ok_or(ActionError::EntrantOutOfRange { index, len })?;
            *slot = team;
        }

        Action::SubmitGame { entered_at } => {
            let max_len = next.limits.max_game_name_len;
            let draft = next.draft.take().ok_or(ActionError::NoGameInProgress)?;
            let game_name = checked_game_name(&draft.game_name, max_len)?;
            let scores = saved_scores(&draft)?;

            info!(
                "Recorded '{}' with {} entrant(s){}",
                game_name,
                scores.len(),
                if draft.is_team_game { " (team game)" } else { "" }
            );
            next.sessions.push(GameSession {
                game_name,
                entered_at,
                scores,
                is_team_game: draft.is_team_game,
                team_assignments: draft.is_team_game.then_some(draft.team_assignments),
            });
        }

        Action::StartEdit(index) => {
            let len = next.sessions.len();
            let session = next
                .sessions
                .get(index)
                .ok_or(ActionError::SessionOutOfRange { index, len })?;
            next.editing = Some(EditDraft {
                index,
                game_name: session.game_name.clone(),
                scores: session.scores.clone(),
            });
        }

        Action::EditScore { index, score } => {
            let editing = next.editing.as_mut().ok_or(ActionError::NotEditing)?;
            let len = editing.scores.len();
            let team = editing
                .scores
                .get(index)
                .ok_or(ActionError::EntrantOutOfRange { index, len })?
                .team;
            // Teammates share one score.
            for (i, entrant) in editing.scores.iter_mut().enumerate() {
                if i == index || (team.is_some() && entrant.team == team) {
                    entrant.score = score;
                }
            }
        }

        Action::EditGameName(name) => {
            next.editing.as_mut().ok_or(ActionError::NotEditing)?.game_name = name;
        }

        Action::SaveEdit => {
            let max_len = next.limits.max_game_name_len;
            let editing = next.editing.take().ok_or(ActionError::NotEditing)?;
            let len = next.sessions.len();
            let session = next
                .sessions
                .get_mut(editing.index)
                .ok_or(ActionError::SessionOutOfRange {
                    index: editing.index,
                    len,
                })?;
            if !editing.game_name.trim().is_empty() {
                session.game_name = checked_game_name(&editing.game_name, max_len)?;
            }
            session.scores = editing.scores;
            info!("Updated game #{} '{}'", editing.index, session.game_name);
        }

        Action::CancelEdit => {
            next.editing = None;
        }

        Action::LoadLog(sessions) => {
            if sessions.is_empty() {
                return Err(ActionError::EmptyLog);
            }
            next.roster = Roster::from_sessions(&sessions);
            next.sessions = sessions;
            next.editing = None;
            info!(
                "Loaded {} game(s), {} player(s)",
                next.sessions.len(),
                next.roster.len()
            );
        }

        Action::SortBy(column) => {
            next.sort = next.sort.toggle(column);
        }
    }

    Ok(next)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn draft_mut(state: &mut AppState) -> Result<&mut GameDraft, ActionError> {
    state.draft.as_mut().ok_or(ActionError::NoGameInProgress)
}

fn entry_mut(draft: &mut GameDraft, index: usize) -> Result<&mut DraftEntry, ActionError> {
    let len = draft.entries.len();
    draft
        .entries
        .get_mut(index)
        .ok_or(ActionError::EntrantOutOfRange { index, len })
}

fn checked_game_name(raw: &str, max_len: usize) -> Result<String, ActionError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ActionError::BlankGameName);
    }
    let len = name.chars().count();
    if len > max_len {
        return Err(ActionError::GameNameTooLong { len, max: max_len });
    }
    Ok(name.to_string())
}

/// The entrant list a draft saves as: active players only. In a team game
/// players are grouped by ascending team id and every member takes the
/// first teammate's score.
fn saved_scores(draft: &GameDraft) -> Result<Vec<EntrantScore>, ActionError> {
    let active: Vec<(usize, &DraftEntry)> = draft
        .entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.active)
        .collect();
    if active.is_empty() {
        return Err(ActionError::NoActiveEntrants);
    }

    if !draft.is_team_game {
        return Ok(active
            .into_iter()
            .map(|(_, e)| EntrantScore::new(e.name.clone(), e.score))
            .collect());
    }

    let mut teams: BTreeMap<TeamId, Vec<&DraftEntry>> = BTreeMap::new();
    for (i, entry) in active {
        let team = draft
            .team_assignments
            .get(i)
            .copied()
            .filter(|&t| t > 0)
            .unwrap_or(DEFAULT_TEAM);
        teams.entry(team).or_default().push(entry);
    }

    Ok(teams
        .into_iter()
        .flat_map(|(team, members)| {
            let score = members.first().map_or(0, |m| m.score);
            members
                .into_iter()
                .map(move |m| EntrantScore::on_team(m.name.clone(), score, team))
        })
        .collect())
}

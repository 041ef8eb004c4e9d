// Session log persistence: the JSON array of recorded games.
//
// A log is validated as a whole before any of it is handed to the engine.
// One bad entry rejects the file; there is no partial load.

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tally_core::session::{is_team_game, GameSession, TeamId, DEFAULT_TEAM};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to read session log {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write session log {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("session log is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session log must be a JSON array of games")]
    NotAnArray,

    #[error("session log contains no games")]
    Empty,

    #[error("game #{index} is malformed: {message}")]
    InvalidEntry { index: usize, message: String },
}

/// Parse and validate a session log.
///
/// In a team game, entrants stored without a team are put on `DEFAULT_TEAM`
/// before validation, so they must match that team's score.
pub fn parse_log(text: &str) -> Result<Vec<GameSession>, LogError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(entries) = value else {
        return Err(LogError::NotAnArray);
    };
    if entries.is_empty() {
        return Err(LogError::Empty);
    }

    let mut sessions = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let mut session: GameSession =
            serde_json::from_value(entry).map_err(|e| LogError::InvalidEntry {
                index,
                message: e.to_string(),
            })?;
        session.resolve_default_teams();
        validate_session(&session)
            .map_err(|message| LogError::InvalidEntry { index, message })?;
        sessions.push(session);
    }

    debug!("Parsed {} game(s) from session log", sessions.len());
    Ok(sessions)
}

/// Check the per-game rules the engine relies on: unique names, positive
/// team ids, and one score per team. A missing team in a team game counts
/// as `DEFAULT_TEAM`.
pub fn validate_session(session: &GameSession) -> Result<(), String> {
    let team_game = is_team_game(&session.scores);
    let mut names = HashSet::new();
    let mut team_scores: HashMap<TeamId, i64> = HashMap::new();

    for entrant in &session.scores {
        if !names.insert(entrant.name.as_str()) {
            return Err(format!(
                "'{}' appears more than once in '{}'",
                entrant.name, session.game_name
            ));
        }
        let team = match entrant.team {
            Some(team) => team,
            None if team_game => DEFAULT_TEAM,
            None => continue,
        };
        if team == 0 {
            return Err(format!("'{}' has team id 0; team ids start at 1", entrant.name));
        }
        let team_score = *team_scores.entry(team).or_insert(entrant.score);
        if team_score != entrant.score {
            return Err(format!(
                "team {team} in '{}' has mixed scores ({team_score} and {})",
                session.game_name, entrant.score
            ));
        }
    }

    Ok(())
}

/// Read and validate the log at `path`.
pub fn load_log(path: &Path) -> Result<Vec<GameSession>, LogError> {
    let text = std::fs::read_to_string(path).map_err(|e| LogError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let sessions = parse_log(&text)?;
    info!("Loaded {} game(s) from {}", sessions.len(), path.display());
    Ok(sessions)
}

/// Pretty-printed JSON for `sessions`, in the same shape `parse_log` reads.
pub fn to_log_json(sessions: &[GameSession]) -> Result<String, LogError> {
    Ok(serde_json::to_string_pretty(sessions)?)
}

/// Sibling of `path` that a save is staged in before it replaces the log.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("sessions.json"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `sessions` to `path`, creating parent directories as needed.
///
/// The JSON is written to a sibling file first and renamed over `path`, so
/// an interrupted save leaves the previous log intact.
pub fn save_log(path: &Path, sessions: &[GameSession]) -> Result<(), LogError> {
    let json = to_log_json(sessions)?;
    let write_err = |e: std::io::Error| LogError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let staged = staging_path(path);
    std::fs::write(&staged, json).map_err(write_err)?;
    if let Err(e) = std::fs::rename(&staged, path) {
        let _ = std::fs::remove_file(&staged);
        return Err(write_err(e));
    }
    info!("Saved {} game(s) to {}", sessions.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tally_core::session::EntrantScore;

    fn expect_invalid(text: &str) -> (usize, String) {
        match parse_log(text) {
            Err(LogError::InvalidEntry { index, message }) => (index, message),
            other => panic!("expected InvalidEntry, got {other:?}"),
        }
    }

    #[test]
    fn parses_minimal_entry() {
        let text = r#"[{"gameName":"Azul","enteredAt":"2025-03-01T19:00:00Z",
                        "scores":[{"name":"A","score":3},{"name":"B","score":-1}]}]"#;
        let sessions = parse_log(text).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].scores[1].score, -1);
        assert!(!sessions[0].is_team_game);
        assert!(sessions[0].team_assignments.is_none());
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(parse_log("[{"), Err(LogError::Json(_))));
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(parse_log(r#"{"gameName":"Azul"}"#), Err(LogError::NotAnArray)));
    }

    #[test]
    fn rejects_empty_array() {
        assert!(matches!(parse_log("[]"), Err(LogError::Empty)));
    }

    #[test]
    fn rejects_missing_game_name() {
        let (index, _) = expect_invalid(
            r#"[{"gameName":"Azul","enteredAt":"2025-03-01T19:00:00Z","scores":[]},
                {"enteredAt":"2025-03-02T19:00:00Z","scores":[]}]"#,
        );
        assert_eq!(index, 1);
    }

    #[test]
    fn rejects_bad_timestamp() {
        let (index, _) = expect_invalid(
            r#"[{"gameName":"Azul","enteredAt":"yesterday","scores":[]}]"#,
        );
        assert_eq!(index, 0);
    }

    #[test]
    fn rejects_non_numeric_score() {
        expect_invalid(
            r#"[{"gameName":"Azul","enteredAt":"2025-03-01T19:00:00Z",
                 "scores":[{"name":"A","score":"ten"}]}]"#,
        );
    }

    #[test]
    fn rejects_duplicate_name() {
        let (_, message) = expect_invalid(
            r#"[{"gameName":"Azul","enteredAt":"2025-03-01T19:00:00Z",
                 "scores":[{"name":"A","score":1},{"name":"A","score":2}]}]"#,
        );
        assert!(message.contains("more than once"));
    }

    #[test]
    fn rejects_team_zero() {
        expect_invalid(
            r#"[{"gameName":"Azul","enteredAt":"2025-03-01T19:00:00Z",
                 "scores":[{"name":"A","score":1,"team":0}]}]"#,
        );
    }

    #[test]
    fn rejects_mixed_team_scores() {
        let (_, message) = expect_invalid(
            r#"[{"gameName":"Codenames","enteredAt":"2025-03-01T19:00:00Z","isTeamGame":true,
                 "scores":[{"name":"A","score":1,"team":1},{"name":"B","score":0,"team":1}]}]"#,
        );
        assert!(message.contains("mixed scores"));
    }

    #[test]
    fn teamless_entrant_joins_default_team() {
        let sessions = parse_log(
            r#"[{"gameName":"Codenames","enteredAt":"2025-03-01T19:00:00Z",
                 "scores":[{"name":"A","score":4,"team":2},{"name":"B","score":4,"team":2},
                           {"name":"C","score":6,"team":1},{"name":"D","score":6}]}]"#,
        )
        .unwrap();
        let session = &sessions[0];
        assert!(session.is_team_game);
        assert_eq!(session.entrant("D").and_then(|e| e.team), Some(DEFAULT_TEAM));
        assert_eq!(session.entrant("A").and_then(|e| e.team), Some(2));
    }

    #[test]
    fn teamless_entrants_must_match_default_team_score() {
        let (index, message) = expect_invalid(
            r#"[{"gameName":"Codenames","enteredAt":"2025-03-01T19:00:00Z",
                 "scores":[{"name":"A","score":4,"team":1},{"name":"B","score":4,"team":1},
                           {"name":"C","score":6},{"name":"D","score":1}]}]"#,
        );
        assert_eq!(index, 0);
        assert!(message.contains("mixed scores"));
    }

    #[test]
    fn validate_counts_missing_team_as_default() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap();
        let session = GameSession::new(
            "Codenames",
            at,
            vec![EntrantScore::on_team("A", 4, DEFAULT_TEAM), EntrantScore::new("B", 2)],
        );
        assert!(validate_session(&session).unwrap_err().contains("mixed scores"));
    }

    #[test]
    fn extreme_scores_load_and_score() {
        let sessions = parse_log(
            r#"[{"gameName":"Azul","enteredAt":"2025-03-01T19:00:00Z",
                 "scores":[{"name":"A","score":9223372036854775807},
                           {"name":"B","score":-9223372036854775808}]}]"#,
        )
        .unwrap();
        let roster = tally_core::roster::Roster::from_sessions(&sessions);
        let rows = tally_core::leaderboard::build_leaderboard(&sessions, &roster);
        assert_eq!(rows[0].name, "A");
        assert_eq!(rows[0].avg_weighted_game_score, Some(100.0));
        assert_eq!(rows[1].avg_weighted_game_score, Some(0.0));
    }

    #[test]
    fn json_round_trips_through_parse() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap();
        let sessions = vec![GameSession::new(
            "Azul",
            at,
            vec![EntrantScore::new("A", 3), EntrantScore::new("B", 5)],
        )];
        let json = to_log_json(&sessions).unwrap();
        assert!(json.contains("\"gameName\": \"Azul\""));
        assert!(json.contains("\"enteredAt\""));
        assert_eq!(parse_log(&json).unwrap(), sessions);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join("tally_log_test_save_load");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested/sessions.json");
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap();
        let sessions = vec![GameSession::new("Azul", at, vec![EntrantScore::new("A", 3)])];

        save_log(&path, &sessions).unwrap();
        assert_eq!(load_log(&path).unwrap(), sessions);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_replaces_existing_log_without_leftovers() {
        let dir = std::env::temp_dir().join("tally_log_test_replace");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sessions.json");
        std::fs::write(&path, "stale").unwrap();

        let at = Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap();
        let sessions = vec![GameSession::new("Azul", at, vec![EntrantScore::new("A", 3)])];
        save_log(&path, &sessions).unwrap();

        assert_eq!(load_log(&path).unwrap(), sessions);
        assert_eq!(staging_path(&path), dir.join("sessions.json.tmp"));
        let files: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(files, vec![OsString::from("sessions.json")]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_missing_file() {
        let path = std::env::temp_dir().join("tally_log_test_missing/none.json");
        assert!(matches!(load_log(&path), Err(LogError::Read { .. })));
    }
}

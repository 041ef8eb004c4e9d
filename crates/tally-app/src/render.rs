// Plain-text rendering of leaderboards, game lists and per-game/per-player
// result tables.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Write;
use tally_core::history::{GameResultLine, PlayerGameEntry};
use tally_core::leaderboard::{format_average, LeaderboardRow, DOMINANCE_DECIMALS};
use tally_core::session::GameSession;
use tally_core::sort::{SortColumn, SortState};

/// `MM/DD/YYYY h:mm AM/PM` in the machine's local time zone.
pub fn format_entered_at(at: &DateTime<Utc>) -> String {
    format_entered_at_in(at, &Local)
}

/// `format_entered_at` for an explicit time zone.
pub fn format_entered_at_in<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%m/%d/%Y %-I:%M %p").to_string()
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>, header: &str) -> usize {
    names
        .map(|n| n.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

fn header_cell(column: SortColumn, sort: &SortState) -> String {
    if column == sort.column {
        format!("{} {}", column.label(), sort.direction.arrow())
    } else {
        column.label().to_string()
    }
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

/// The leaderboard as a fixed-width table, rows in the order given. The
/// active sort column carries a direction arrow.
pub fn leaderboard_table(rows: &[LeaderboardRow], sort: &SortState) -> String {
    let name_header = header_cell(SortColumn::Name, sort);
    let width = name_width(rows.iter().map(|r| r.name.as_str()), &name_header);

    let stat_columns = [
        SortColumn::GamesPlayed,
        SortColumn::Wins,
        SortColumn::AvgPlacement,
        SortColumn::AvgGameScore,
        SortColumn::AvgWeightedGameScore,
        SortColumn::AvgDominance,
    ];

    let mut out = String::new();
    let _ = write!(out, "{:>3}  {:<width$}", "#", name_header);
    for column in stat_columns {
        let _ = write!(out, "  {:>16}", header_cell(column, sort));
    }
    out.push('\n');

    for (i, row) in rows.iter().enumerate() {
        let _ = write!(out, "{:>3}  {:<width$}", i + 1, row.name);
        let cells = [
            row.games_played.to_string(),
            row.wins.to_string(),
            row.avg_placement_display(),
            row.avg_game_score_display(),
            row.avg_weighted_game_score_display(),
            row.avg_dominance_display(),
        ];
        for cell in cells {
            let _ = write!(out, "  {:>16}", cell);
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Game log
// ---------------------------------------------------------------------------

/// One line per recorded game: index, name, date, entrant count.
pub fn game_list(sessions: &[GameSession]) -> String {
    let width = name_width(sessions.iter().map(|s| s.game_name.as_str()), "Game");
    let mut out = String::new();
    let _ = writeln!(out, "{:>3}  {:<width$}  {:<19}  Players", "#", "Game", "Entered");
    for (i, session) in sessions.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<width$}  {:<19}  {}{}",
            i,
            session.game_name,
            format_entered_at(&session.entered_at),
            session.scores.len(),
            if session.is_team_game { " (teams)" } else { "" }
        );
    }
    out
}

/// Result table for one game.
pub fn game_breakdown_table(session: &GameSession, lines: &[GameResultLine]) -> String {
    let width = name_width(lines.iter().map(|l| l.name.as_str()), "Player");
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({})",
        session.game_name,
        format_entered_at(&session.entered_at)
    );
    let _ = writeln!(
        out,
        "{:<width$}  {:>6}  {:>4}  {:>5}  {:>5}  {:>8}  {:>9}",
        "Player", "Score", "Team", "Place", "Game", "Weighted", "Dominance"
    );
    for line in lines {
        let _ = writeln!(
            out,
            "{:<width$}  {:>6}  {:>4}  {:>5}  {:>5}  {:>8}  {:>9}{}",
            line.name,
            line.score,
            line.team.map(|t| t.to_string()).unwrap_or_default(),
            line.placement,
            line.game_score,
            line.weighted_game_score,
            format_average(Some(line.dominance), DOMINANCE_DECIMALS),
            if line.is_win { "  *" } else { "" }
        );
    }
    out
}

/// Every game one player took part in.
pub fn player_history_table(player: &str, entries: &[PlayerGameEntry]) -> String {
    let width = name_width(entries.iter().map(|e| e.game_name.as_str()), "Game");
    let mut out = String::new();
    let _ = writeln!(out, "{player}: {} game(s)", entries.len());
    let _ = writeln!(
        out,
        "{:<width$}  {:<19}  {:>6}  {:>5}  {:>5}  {:>8}  {:>9}",
        "Game", "Entered", "Score", "Place", "Game", "Weighted", "Dominance"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<width$}  {:<19}  {:>6}  {:>5}  {:>5}  {:>8}  {:>9}{}",
            entry.game_name,
            format_entered_at(&entry.entered_at),
            entry.score,
            entry.placement,
            entry.game_score,
            entry.weighted_game_score,
            format_average(Some(entry.dominance), DOMINANCE_DECIMALS),
            if entry.is_win { "  *" } else { "" }
        );
    }
    out
}

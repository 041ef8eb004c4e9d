// Leaderboard CSV export.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tally_core::leaderboard::{
    format_average, LeaderboardRow, DOMINANCE_DECIMALS, GAME_SCORE_DECIMALS, PLACEMENT_DECIMALS,
    WEIGHTED_GAME_SCORE_DECIMALS,
};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV record. Averages are pre-formatted at display precision; an
/// empty field means the player has no games.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    name: &'a str,
    wins: u32,
    avg_placement: String,
    avg_game_score: String,
    avg_weighted_game_score: String,
    avg_dominance: String,
    games_played: u32,
}

fn field(value: Option<f64>, decimals: u32) -> String {
    value
        .map(|v| format_average(Some(v), decimals))
        .unwrap_or_default()
}

pub const CSV_HEADER: [&str; 8] = [
    "rank",
    "name",
    "wins",
    "avg_placement",
    "avg_game_score",
    "avg_weighted_game_score",
    "avg_dominance",
    "games_played",
];

/// Write `rows` as CSV to `writer`, ranked in the order given. The header is
/// written even when there are no rows.
pub fn write_leaderboard_csv<W: Write>(
    rows: &[LeaderboardRow],
    writer: W,
) -> Result<(), ExportError> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for (i, row) in rows.iter().enumerate() {
        out.serialize(CsvRow {
            rank: i + 1,
            name: &row.name,
            wins: row.wins,
            avg_placement: field(row.avg_placement, PLACEMENT_DECIMALS),
            avg_game_score: field(row.avg_game_score, GAME_SCORE_DECIMALS),
            avg_weighted_game_score: field(
                row.avg_weighted_game_score,
                WEIGHTED_GAME_SCORE_DECIMALS,
            ),
            avg_dominance: field(row.avg_dominance, DOMINANCE_DECIMALS),
            games_played: row.games_played,
        })?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `rows` as CSV to the file at `path`.
pub fn export_leaderboard_csv(rows: &[LeaderboardRow], path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    write_leaderboard_csv(rows, file)?;
    info!("Exported {} leaderboard row(s) to {}", rows.len(), path.display());
    Ok(())
}

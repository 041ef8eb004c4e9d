// Leaderboard re-ordering by any column, numeric-aware.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::leaderboard::LeaderboardRow;

// ---------------------------------------------------------------------------
// Columns and directions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortKeyError {
    #[error("unknown sort column `{0}`")]
    UnknownColumn(String),

    #[error("unknown sort direction `{0}` (expected `asc` or `desc`)")]
    UnknownDirection(String),
}

/// A leaderboard column that rows can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Name,
    GamesPlayed,
    Wins,
    AvgPlacement,
    AvgGameScore,
    AvgWeightedGameScore,
    AvgDominance,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Name,
        SortColumn::GamesPlayed,
        SortColumn::Wins,
        SortColumn::AvgPlacement,
        SortColumn::AvgGameScore,
        SortColumn::AvgWeightedGameScore,
        SortColumn::AvgDominance,
    ];

    /// Record key for the column, as used in saved settings and on the
    /// command line.
    pub fn key(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::GamesPlayed => "gamesPlayed",
            SortColumn::Wins => "wins",
            SortColumn::AvgPlacement => "avgPlacement",
            SortColumn::AvgGameScore => "avgGameScore",
            SortColumn::AvgWeightedGameScore => "avgWeightedGameScore",
            SortColumn::AvgDominance => "avgDominance",
        }
    }

    /// Column header text.
    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "Player",
            SortColumn::GamesPlayed => "Games Played",
            SortColumn::Wins => "Wins",
            SortColumn::AvgPlacement => "Avg Placement",
            SortColumn::AvgGameScore => "Avg Game Score",
            SortColumn::AvgWeightedGameScore => "Avg Weighted Game Score",
            SortColumn::AvgDominance => "Avg Game Dominance",
        }
    }

    /// Direction a column starts in when first selected. Lower placement is
    /// better, so it starts ascending; counts and scores start descending.
    pub fn natural_direction(&self) -> SortDirection {
        match self {
            SortColumn::Name | SortColumn::AvgPlacement => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortColumn {
    type Err = SortKeyError;

    /// Accepts the record key (`avgPlacement`) or its snake_case spelling
    /// (`avg_placement`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "").to_lowercase();
        SortColumn::ALL
            .into_iter()
            .find(|c| c.key().to_lowercase() == wanted)
            .ok_or_else(|| SortKeyError::UnknownColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header marker for the active sort column.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(SortKeyError::UnknownDirection(s.to_string())),
        }
    }
}

/// The active leaderboard ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            column: SortColumn::Wins,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Select `column`: re-selecting the active column flips its direction,
    /// a new column starts in its natural direction.
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == column {
            SortState {
                column,
                direction: self.direction.flip(),
            }
        } else {
            SortState {
                column,
                direction: column.natural_direction(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// A cell value as the comparator sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue {
    Numeric(f64),
    /// Not a number: a plain name, or the no-data marker.
    Opaque,
}

/// The comparable value of `column` in `row`. Names that parse as numbers
/// compare numerically.
pub fn sort_value(row: &LeaderboardRow, column: SortColumn) -> SortValue {
    let numeric = |v: Option<f64>| v.map_or(SortValue::Opaque, SortValue::Numeric);
    match column {
        SortColumn::Name => numeric(row.name.trim().parse::<f64>().ok().filter(|v| v.is_finite())),
        SortColumn::GamesPlayed => SortValue::Numeric(f64::from(row.games_played)),
        SortColumn::Wins => SortValue::Numeric(f64::from(row.wins)),
        SortColumn::AvgPlacement => numeric(row.avg_placement),
        SortColumn::AvgGameScore => numeric(row.avg_game_score),
        SortColumn::AvgWeightedGameScore => numeric(row.avg_weighted_game_score),
        SortColumn::AvgDominance => numeric(row.avg_dominance),
    }
}

/// Compare two cell values.
///
/// Numbers compare numerically in the requested direction. Two opaque
/// values are equal, so they are never reordered relative to each other.
/// Opaque values always follow numeric ones, in either direction. Only the
/// numeric comparison is reversed for a descending sort, so a player with no
/// data stays at the bottom of a descending column instead of rising to the
/// top as it would if the whole ascending order were flipped (or if `—` were
/// compared as text, where it sorts after every digit).
pub fn compare_values(a: SortValue, b: SortValue, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortValue::Numeric(x), SortValue::Numeric(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
        (SortValue::Numeric(_), SortValue::Opaque) => Ordering::Less,
        (SortValue::Opaque, SortValue::Numeric(_)) => Ordering::Greater,
        (SortValue::Opaque, SortValue::Opaque) => Ordering::Equal,
    }
}

/// Stable in-place sort of `rows` by `column`.
pub fn sort_rows(rows: &mut [LeaderboardRow], column: SortColumn, direction: SortDirection) {
    rows.sort_by(|a, b| compare_values(sort_value(a, column), sort_value(b, column), direction));
}

/// Return a copy of `rows` ordered by `column`. Equal keys keep their input
/// order, so sorting an already-sorted list is a no-op.
pub fn sort_by(
    rows: &[LeaderboardRow],
    column: SortColumn,
    direction: SortDirection,
) -> Vec<LeaderboardRow> {
    let mut sorted = rows.to_vec();
    sort_rows(&mut sorted, column, direction);
    sorted
}

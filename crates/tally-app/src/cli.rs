// Command-line parsing for the `tally` binary.

use std::path::PathBuf;

use tally_core::sort::{SortColumn, SortDirection, SortKeyError};
use thiserror::Error;

pub const USAGE: &str = "\
usage: tally [COMMAND]

commands:
  leaderboard [--sort COLUMN] [--asc|--desc]   show the leaderboard (default)
  games                                        list recorded games
  game INDEX                                   show one game's results
  player NAME                                  show one player's games
  export-csv PATH                              write the leaderboard as CSV
  import PATH                                  validate a session log and make it current

columns: name, gamesPlayed, wins, avgPlacement, avgGameScore,
         avgWeightedGameScore, avgDominance";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Leaderboard {
        column: Option<SortColumn>,
        direction: Option<SortDirection>,
    },
    Games,
    Game(usize),
    Player(String),
    ExportCsv(PathBuf),
    Import(PathBuf),
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),

    #[error("`{0}` is not a game number")]
    BadIndex(String),

    #[error(transparent)]
    SortKey(#[from] SortKeyError),
}

/// Parse the arguments after the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let Some(command) = args.next() else {
        return Ok(Command::Leaderboard {
            column: None,
            direction: None,
        });
    };

    let parsed = match command.as_str() {
        "leaderboard" => return parse_leaderboard(args),
        "games" => Command::Games,
        "game" => {
            let raw = required(&mut args, "game", "a game number")?;
            Command::Game(raw.parse().map_err(|_| CliError::BadIndex(raw))?)
        }
        "player" => Command::Player(required(&mut args, "player", "a player name")?),
        "export-csv" => Command::ExportCsv(required(&mut args, "export-csv", "a file path")?.into()),
        "import" => Command::Import(required(&mut args, "import", "a file path")?.into()),
        "help" | "-h" | "--help" => Command::Help,
        other => return Err(CliError::UnknownCommand(other.to_string())),
    };

    match args.next() {
        Some(extra) => Err(CliError::UnexpectedArgument(extra)),
        None => Ok(parsed),
    }
}

fn required(
    args: &mut impl Iterator<Item = String>,
    command: &'static str,
    expected: &'static str,
) -> Result<String, CliError> {
    args.next()
        .ok_or(CliError::MissingArgument { command, expected })
}

fn parse_leaderboard(mut args: impl Iterator<Item = String>) -> Result<Command, CliError> {
    let mut column = None;
    let mut direction = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sort" => {
                let raw = required(&mut args, "--sort", "a column name")?;
                column = Some(raw.parse::<SortColumn>()?);
            }
            "--asc" => direction = Some(SortDirection::Asc),
            "--desc" => direction = Some(SortDirection::Desc),
            _ => return Err(CliError::UnexpectedArgument(arg)),
        }
    }
    Ok(Command::Leaderboard { column, direction })
}

// Configuration loading and parsing (tally.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tally_core::roster::Roster;
use tally_core::sort::{SortColumn, SortDirection, SortState};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub roster: Roster,
    pub log_path: PathBuf,
    pub entry: EntryLimits,
    pub sort: SortState,
}

// ---------------------------------------------------------------------------
// tally.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire tally.toml file.
#[derive(Debug, Clone, Deserialize)]
struct TallyFile {
    roster: RosterSection,
    log: LogSection,
    #[serde(default)]
    entry: EntryLimits,
    #[serde(default)]
    display: DisplaySection,
}

#[derive(Debug, Clone, Deserialize)]
struct RosterSection {
    players: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LogSection {
    path: String,
}

/// Limits enforced by the game-entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EntryLimits {
    pub max_teams: u32,
    pub max_game_name_len: usize,
}

impl Default for EntryLimits {
    fn default() -> Self {
        EntryLimits {
            max_teams: 6,
            max_game_name_len: 64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DisplaySection {
    sort_column: String,
    sort_direction: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        DisplaySection {
            sort_column: "wins".into(),
            sort_direction: "desc".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/tally.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("tally.toml");
    let text = read_file(&path)?;
    let file: TallyFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&file)?;

    let column: SortColumn =
        file.display
            .sort_column
            .parse()
            .map_err(|e| ConfigError::ValidationError {
                field: "display.sort_column".into(),
                message: format!("{e}"),
            })?;
    let direction: SortDirection =
        file.display
            .sort_direction
            .parse()
            .map_err(|e| ConfigError::ValidationError {
                field: "display.sort_direction".into(),
                message: format!("{e}"),
            })?;

    Ok(Config {
        roster: Roster::from_names(file.roster.players.iter().map(|p| p.trim())),
        log_path: base_dir.join(&file.log.path),
        entry: file.entry,
        sort: SortState { column, direction },
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();
    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            // Never overwrite a user's edited copy.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Loads config relative to the current working directory, copying default
/// config files into place first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &TallyFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for (i, player) in file.roster.players.iter().enumerate() {
        let name = player.trim();
        if name.is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("roster.players[{i}]"),
                message: "must not be blank".into(),
            });
        }
        if !seen.insert(name) {
            return Err(ConfigError::ValidationError {
                field: format!("roster.players[{i}]"),
                message: format!("duplicate player '{name}'"),
            });
        }
    }

    if file.log.path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "log.path".into(),
            message: "must not be blank".into(),
        });
    }

    if file.entry.max_teams == 0 {
        return Err(ConfigError::ValidationError {
            field: "entry.max_teams".into(),
            message: "must be > 0".into(),
        });
    }
    if file.entry.max_game_name_len == 0 {
        return Err(ConfigError::ValidationError {
            field: "entry.max_game_name_len".into(),
            message: "must be > 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

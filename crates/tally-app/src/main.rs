// Score tracker entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file; the terminal carries command output)
// 2. Load config
// 3. Load the session log, if one has been saved
// 4. Run the requested command

use std::path::Path;

use tally_app::cli::{self, Command};
use tally_app::config;
use tally_app::export;
use tally_app::log;
use tally_app::render;
use tally_app::state::{reduce, Action, AppState};
use tally_core::history::{game_breakdown, player_history};
use tally_core::session::GameSession;
use tally_core::sort::SortState;

use anyhow::{bail, Context};
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    let command = cli::parse_args(std::env::args().skip(1)).context("invalid arguments")?;
    if command == Command::Help {
        println!("{}", cli::USAGE);
        return Ok(());
    }
    info!("Running {:?}", command);

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} player(s), log at {}",
        config.roster.len(),
        config.log_path.display()
    );

    // 3. Load saved sessions
    let sessions = load_sessions(&config.log_path)?;
    let state = AppState::from_config(&config, sessions);

    // 4. Run the command
    match command {
        Command::Leaderboard { column, direction } => {
            let mut state = state;
            if let Some(column) = column {
                state.sort = SortState {
                    column,
                    direction: column.natural_direction(),
                };
            }
            if let Some(direction) = direction {
                state.sort.direction = direction;
            }
            print!("{}", render::leaderboard_table(&state.leaderboard(), &state.sort));
        }
        Command::Games => {
            print!("{}", render::game_list(&state.sessions));
        }
        Command::Game(index) => {
            let Some(session) = state.sessions.get(index) else {
                bail!(
                    "no game #{index}; {} game(s) recorded",
                    state.sessions.len()
                );
            };
            print!(
                "{}",
                render::game_breakdown_table(session, &game_breakdown(session))
            );
        }
        Command::Player(name) => {
            if !state.roster.contains(&name) {
                bail!("no player named '{name}'");
            }
            let entries = player_history(&state.sessions, &name);
            print!("{}", render::player_history_table(&name, &entries));
        }
        Command::ExportCsv(path) => {
            export::export_leaderboard_csv(&state.leaderboard(), &path)
                .with_context(|| format!("failed to export leaderboard to {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        Command::Import(path) => {
            let imported = log::load_log(&path)
                .with_context(|| format!("failed to import {}", path.display()))?;
            let state = reduce(&state, Action::LoadLog(imported))?;
            log::save_log(&config.log_path, &state.sessions)
                .context("failed to save imported session log")?;
            println!(
                "Imported {} game(s) for {} player(s)",
                state.sessions.len(),
                state.roster.len()
            );
        }
        Command::Help => println!("{}", cli::USAGE),
    }

    Ok(())
}

/// Saved sessions, or none if nothing has been saved yet. A log that exists
/// but fails validation is an error.
fn load_sessions(path: &Path) -> anyhow::Result<Vec<GameSession>> {
    if !path.exists() {
        info!("No session log at {}; starting empty", path.display());
        return Ok(Vec::new());
    }
    log::load_log(path).with_context(|| format!("failed to load session log {}", path.display()))
}

/// Initialize tracing to log to a file (not the terminal, which carries the
/// command's output).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("tally.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tally_app=info,tally_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

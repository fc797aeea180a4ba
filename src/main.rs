//! # tb - Terminal Kanban Board
//!
//! An in-memory kanban board for the terminal: ordered columns of task
//! cards, moved with the mouse (drag and drop) or the keyboard.
//!
//! ## Key Features
//!
//! - **Columns**: up to six, each with an optional advisory WIP limit, and
//!   collapsible to a narrow strip
//! - **Cards**: title, description, priority, assignee, tags and due date,
//!   created and edited through a modal form
//! - **Drag and drop**: cards follow the pointer across columns and drop
//!   onto a card to reorder
//! - **Keyboard navigation**: arrows, Home/End and Enter move focus over the
//!   visible cards; Ctrl+arrows move the focused card
//! - **Filtering**: debounced text search plus assignee, priority and tag
//!   filters that never alter the underlying board
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the board with the configured columns
//! tb ui
//!
//! # Launch from a seed board, or the built-in demo
//! tb ui --seed board.json
//! tb ui --demo
//!
//! # Print the cards matching a query
//! tb show --seed board.json --query login --priority high
//! ```
//!
//! The board lives in memory only: nothing is written back when the
//! session ends. Settings are read from `~/.tb/config.json` and the
//! interactive board logs to `~/.tb/logs/tb.log`.

use std::io;
use std::path::Path;

use clap::Parser;

pub mod board;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod drag;
pub mod error;
pub mod fields;
pub mod filter;
pub mod keyboard;
pub mod logging;
pub mod ordering;
pub mod sample;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::{data_dir, Config};
use error::Result;
use filter::FilterCriteria;
use logging::{init_logging, LogSink};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let dir = data_dir(cli.dir.as_deref());

    // The board owns the terminal, so it logs to a file.
    let (sink, default_level) = if cli.command.is_interactive() {
        (LogSink::file_in(&dir), "info")
    } else {
        (LogSink::Stderr, "warn")
    };
    init_logging(cli.log_level.as_deref().unwrap_or(default_level), &sink)?;

    dispatch(cli.command, &dir)
}

/// Run a command. Configuration is only read by commands that build a board.
fn dispatch(command: Commands, dir: &Path) -> Result<()> {
    match command {
        Commands::Ui { seed, demo } => {
            let config = Config::load(dir)?;
            let board = load_board(seed.as_deref(), demo, &config)?;
            cmd_ui(board, config)
        }

        Commands::Show { seed, demo, query, assignee, priority, tag, json } => {
            let config = Config::load(dir)?;
            let board = load_board(seed.as_deref(), demo, &config)?;
            let criteria = FilterCriteria {
                query: query.unwrap_or_default(),
                assignee,
                priority,
                tag,
            };
            cmd_show(&board, &criteria, json, &mut io::stdout().lock())
        }

        Commands::Facets { seed, demo } => {
            let config = Config::load(dir)?;
            let board = load_board(seed.as_deref(), demo, &config)?;
            cmd_facets(&board, &mut io::stdout().lock())
        }

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use clap_complete::Shell;

    fn dir_with_broken_config() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(config::CONFIG_FILE), "{ not json").unwrap();
        dir
    }

    #[test]
    fn test_completions_do_not_read_config() {
        let dir = dir_with_broken_config();
        dispatch(Commands::Completions { shell: Shell::Bash }, dir.path()).unwrap();
    }

    #[test]
    fn test_board_commands_report_broken_config() {
        let dir = dir_with_broken_config();
        let err = dispatch(Commands::Facets { seed: None, demo: true }, dir.path()).unwrap_err();
        assert!(matches!(err, BoardError::Config { .. }));
    }
}

//! Command implementations for the CLI interface.
//!
//! Every command works on an in-memory board built either from a seed JSON
//! file or from the configured column seeds. Nothing is written back.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::board::Board;
use crate::config::Config;
use crate::dates::{format_due_relative, truncate};
use crate::error::Result;
use crate::fields::Priority;
use crate::filter::{filter_columns, FilterCriteria};
use crate::sample::sample_board;
use crate::tui::run::run_board_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive board.
    Ui {
        /// Seed board JSON file. Without it the board starts from the configured columns.
        #[arg(long)]
        seed: Option<PathBuf>,
        /// Start from the built-in demo board.
        #[arg(long, conflicts_with = "seed")]
        demo: bool,
    },

    /// Print the board, optionally filtered.
    Show {
        /// Seed board JSON file.
        #[arg(long)]
        seed: Option<PathBuf>,
        /// Start from the built-in demo board.
        #[arg(long, conflicts_with = "seed")]
        demo: bool,
        /// Case-insensitive text matched against title, description, assignee and tags.
        #[arg(long)]
        query: Option<String>,
        /// Exact assignee name.
        #[arg(long)]
        assignee: Option<String>,
        /// Priority: low | medium | high | urgent.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Exact tag.
        #[arg(long)]
        tag: Option<String>,
        /// Print the filtered board as JSON (loadable with --seed).
        #[arg(long)]
        json: bool,
    },

    /// List distinct assignees, tags and priorities on the board.
    Facets {
        /// Seed board JSON file.
        #[arg(long)]
        seed: Option<PathBuf>,
        /// Start from the built-in demo board.
        #[arg(long, conflicts_with = "seed")]
        demo: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Whether the command takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Commands::Ui { .. })
    }
}

/// Build the starting board from a seed file, the demo board, or the
/// configured columns.
pub fn load_board(seed: Option<&Path>, demo: bool, config: &Config) -> Result<Board> {
    match seed {
        Some(path) => Board::load(path),
        None if demo => sample_board(Utc::now()),
        None => Board::from_seeds(&config.columns),
    }
}

/// Launch the interactive board.
pub fn cmd_ui(board: Board, config: Config) -> Result<()> {
    run_board_tui(board, config)?;
    Ok(())
}

/// Print the filtered projection as a table or as JSON.
pub fn cmd_show(board: &Board, criteria: &FilterCriteria, json: bool, out: &mut impl Write) -> Result<()> {
    let view = filter_columns(board.columns(), criteria);
    if json {
        writeln!(out, "{}", Board::new(view)?.to_json()?)?;
        return Ok(());
    }

    let today = Local::now().date_naive();
    for column in &view {
        let count = match column.wip_limit {
            Some(limit) => format!("{}/{limit}", column.tasks.len()),
            None => column.tasks.len().to_string(),
        };
        let marker = if column.is_over_wip_limit() { " WIP exceeded" } else { "" };
        let collapsed = if column.collapsed { " (collapsed)" } else { "" };
        writeln!(out, "== {} [{count}]{marker}{collapsed}", column.title)?;
        if column.tasks.is_empty() {
            writeln!(out, "  (empty)")?;
            continue;
        }
        writeln!(
            out,
            "  {:<10} {:<32} {:<8} {:<10} {:<16} {}",
            "ID", "Title", "Priority", "Due", "Assignee", "Tags"
        )?;
        for task in &column.tasks {
            writeln!(
                out,
                "  {:<10} {:<32} {:<8} {:<10} {:<16} {}",
                truncate(&task.id, 10),
                truncate(&task.title, 32),
                task.priority.label(),
                format_due_relative(task.due_date, today),
                truncate(task.assignee_name().unwrap_or("-"), 16),
                if task.tags.is_empty() { "-".to_string() } else { task.tags.join(",") }
            )?;
        }
    }
    if !criteria.is_empty() {
        let shown: usize = view.iter().map(|c| c.tasks.len()).sum();
        writeln!(out, "{shown} of {} tasks match {}", board.task_count(), criteria.describe())?;
    }
    Ok(())
}

/// Print the distinct filter values present on the board.
pub fn cmd_facets(board: &Board, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Assignees:")?;
    for assignee in board.assignees() {
        writeln!(out, "  {} ({})", assignee.name, assignee.initials())?;
    }
    writeln!(out, "Tags:")?;
    for tag in board.tags() {
        writeln!(out, "  {tag}")?;
    }
    writeln!(out, "Priorities:")?;
    for priority in board.priorities() {
        writeln!(out, "  {}", priority.label())?;
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

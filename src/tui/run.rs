//! Terminal setup and teardown around the board app.

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::{info, warn};

use crate::board::Board;
use crate::config::Config;
use crate::tui::app::BoardApp;

/// Run the interactive board until the user quits.
///
/// The terminal is restored when setup or the event loop fails.
pub fn run_board_tui(board: Board, config: Config) -> io::Result<()> {
    enable_raw_mode()?;
    let mut terminal = or_restore(setup_terminal(), restore_terminal)?;

    let mut app = BoardApp::new(board, config);
    info!(
        columns = app.board().columns().len(),
        tasks = app.board().task_count(),
        "board opened"
    );
    let result = app.run(&mut terminal);

    restore_terminal();
    terminal.show_cursor()?;

    info!(tasks = app.board().task_count(), "board closed");
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Leave raw mode, the alternate screen and mouse capture.
///
/// Best effort: a failing step is logged and the rest still run.
fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        warn!(error = %e, "failed to disable raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture) {
        warn!(error = %e, "failed to leave alternate screen");
    }
}

/// Pass `result` through, running `restore` first when it is an error.
fn or_restore<T>(result: io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

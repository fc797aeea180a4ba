use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal kanban board.
/// Settings and logs live in ~/.tb or the directory passed via --dir.
#[derive(Parser)]
#[command(name = "tb", version, about = "Terminal kanban board")]
pub struct Cli {
    /// Data directory holding config.json and logs.
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (default: info for the board, warn otherwise).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

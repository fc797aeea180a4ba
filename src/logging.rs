//! Tracing subscriber setup.
//!
//! The board UI owns stdout, so interactive sessions log to
//! `<data dir>/logs/tb.log`; one-shot commands log to stderr.
//! `RUST_LOG` overrides the level passed on the command line.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "tb.log";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
}

impl LogSink {
    /// The log file inside the data directory.
    pub fn file_in(data_dir: &Path) -> Self {
        LogSink::File(data_dir.join(LOG_DIR).join(LOG_FILE))
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("{}={level},warn", env!("CARGO_CRATE_NAME"))))
}

/// Install the global subscriber. Installing twice is a no-op.
pub fn init_logging(level: &str, sink: &LogSink) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(false);

    let installed = match sink {
        LogSink::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogSink::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    if installed.is_ok() {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), ?sink, "logging initialised");
    }
    Ok(())
}

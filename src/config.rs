//! Board configuration.
//!
//! Settings live in `config.json` inside the data directory. A missing file
//! means defaults; a malformed file is an error the caller reports.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoardError, Result};

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Upper bound for `default_due_days`, roughly a century.
const MAX_DUE_DAYS: i64 = 36_500;

/// Initial column definition used when no seed board is given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnSeed {
    /// Stable id; derived from the title when omitted.
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub wip_limit: Option<u32>,
}

impl ColumnSeed {
    fn titled(title: &str) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            wip_limit: None,
        }
    }

    /// The column id: the explicit id, or the title lowercased with runs of
    /// non-alphanumerics collapsed to `-`.
    pub fn column_id(&self) -> String {
        if let Some(id) = &self.id {
            return id.clone();
        }
        let mut slug = String::new();
        for ch in self.title.trim().chars() {
            if ch.is_alphanumeric() {
                slug.extend(ch.to_lowercase());
            } else if !slug.ends_with('-') && !slug.is_empty() {
                slug.push('-');
            }
        }
        slug.trim_end_matches('-').to_string()
    }
}

/// User configuration for the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Delay before a typed search query is applied.
    pub search_debounce_ms: u64,
    /// Days between task creation and its default due date.
    pub default_due_days: i64,
    /// Event poll interval for the terminal loop.
    pub tick_ms: u64,
    /// Columns of a fresh board.
    pub columns: Vec<ColumnSeed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            default_due_days: crate::board::DEFAULT_DUE_DAYS,
            tick_ms: 50,
            columns: vec![
                ColumnSeed::titled("To Do"),
                ColumnSeed::titled("In Progress"),
                ColumnSeed::titled("Review"),
                ColumnSeed::titled("Done"),
            ],
        }
    }
}

impl Config {
    /// Load configuration from `dir/config.json`, falling back to defaults
    /// when the file does not exist.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Self::load_file(&path)
    }

    /// Load configuration from an explicit file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let mut buf = String::new();
        File::open(path)?.read_to_string(&mut buf)?;
        let config: Config = serde_json::from_str(&buf).map_err(|e| BoardError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.check(path)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn check(&self, path: &Path) -> Result<()> {
        if self.columns.is_empty() {
            return Err(BoardError::Config {
                path: path.to_path_buf(),
                message: "at least one column is required".into(),
            });
        }
        let mut ids = HashSet::new();
        for seed in &self.columns {
            let id = seed.column_id();
            if id.is_empty() {
                return Err(BoardError::Config {
                    path: path.to_path_buf(),
                    message: format!("column '{}' has no usable id", seed.title),
                });
            }
            if !ids.insert(id.clone()) {
                return Err(BoardError::Config {
                    path: path.to_path_buf(),
                    message: format!("duplicate column id '{id}'"),
                });
            }
        }
        if !(0..=MAX_DUE_DAYS).contains(&self.default_due_days) {
            return Err(BoardError::Config {
                path: path.to_path_buf(),
                message: format!("default_due_days must be between 0 and {MAX_DUE_DAYS}"),
            });
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn default_due(&self) -> chrono::Duration {
        chrono::Duration::days(self.default_due_days)
    }
}

/// Resolve the data directory: an explicit `--dir`, else `$HOME/.tb`.
pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".tb")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("To Do", "to-do")]
    #[case("  In   Progress! ", "in-progress")]
    #[case("Done", "done")]
    fn test_seed_column_id_from_title(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(ColumnSeed::titled(title).column_id(), expected);
    }

    #[test]
    fn test_explicit_seed_id_wins() {
        let seed = ColumnSeed {
            id: Some("todo".into()),
            title: "To Do".into(),
            wip_limit: None,
        };
        assert_eq!(seed.column_id(), "todo");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.columns.len(), 4);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"search_debounce_ms": 150}"#).unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.search_debounce_ms, 150);
        assert_eq!(config.default_due_days, 3);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert!(matches!(
            Config::load(dir.path()).unwrap_err(),
            BoardError::Config { .. }
        ));
    }

    #[test]
    fn test_empty_columns_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"columns": []}"#).unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[rstest]
    #[case(r#"{"columns": [{"title": "Done"}, {"title": "done!"}]}"#, "duplicate column id 'done'")]
    #[case(r#"{"columns": [{"title": "To Do"}, {"title": "???"}]}"#, "column '???' has no usable id")]
    #[case(r#"{"columns": [{"title": "A", "id": "x"}, {"title": "B", "id": "x"}]}"#, "duplicate column id 'x'")]
    fn test_bad_column_ids_rejected(#[case] json: &str, #[case] expected: &str) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), json).unwrap();
        match Config::load(dir.path()).unwrap_err() {
            BoardError::Config { message, .. } => assert_eq!(message, expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[case(-1)]
    #[case(36_501)]
    #[case(i64::MAX)]
    fn test_out_of_range_due_days_rejected(#[case] days: i64) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), format!(r#"{{"default_due_days": {days}}}"#)).unwrap();
        assert!(matches!(
            Config::load(dir.path()).unwrap_err(),
            BoardError::Config { .. }
        ));
    }

    #[test]
    fn test_data_dir_prefers_explicit() {
        assert_eq!(data_dir(Some(Path::new("/tmp/x"))), PathBuf::from("/tmp/x"));
    }
}

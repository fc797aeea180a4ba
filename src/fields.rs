//! Enumerations and field types for board tasks.
//!
//! This module defines the structured values used to categorise tasks,
//! along with the small formatting helpers the views share.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "Low")]
    Low,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
    #[serde(alias = "Urgent")]
    Urgent,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    /// Next priority in the cycle used by the form selector.
    pub fn next(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Urgent,
            Priority::Urgent => Priority::Low,
        }
    }

    /// Previous priority in the cycle used by the form selector.
    pub fn prev(self) -> Priority {
        match self {
            Priority::Low => Priority::Urgent,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
            Priority::Urgent => Priority::High,
        }
    }
}

/// Person a task is assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Assignee {
    pub name: String,
    /// Avatar reference (URL or initials); rendering decides what to do with it.
    #[serde(default)]
    pub avatar: String,
}

impl Assignee {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: String::new(),
        }
    }

    /// Initials derived from the name, used when no avatar is set.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_cycle_is_closed() {
        for p in Priority::ALL {
            assert_eq!(p.next().prev(), p);
        }
    }

    #[test]
    fn test_priority_serde_is_kebab_case() {
        let json = serde_json::to_string(&Priority::Urgent).unwrap();
        assert_eq!(json, "\"urgent\"");
        let parsed: Priority = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(parsed, Priority::High);
    }

    #[test]
    fn test_assignee_initials() {
        assert_eq!(Assignee::new("ada lovelace").initials(), "AL");
        assert_eq!(Assignee::new("Grace").initials(), "G");
    }
}

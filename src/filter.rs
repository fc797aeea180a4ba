//! Filter and search projections.
//!
//! Everything here is a pure recomputation over a column slice: filtering
//! never touches the store. The only stateful piece is [`SearchDebounce`],
//! which holds back typed query text until input has been quiet for a
//! fixed delay.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use crate::fields::{Assignee, Priority};
use crate::task::{Column, Task};

/// Free-text query plus optional exact-match filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
    pub tag: Option<String>,
}

impl FilterCriteria {
    /// Whether no filter is in effect.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.assignee.is_none()
            && self.priority.is_none()
            && self.tag.is_none()
    }

    /// Whether a single task passes every active filter.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(assignee) = &self.assignee {
            if task.assignee_name() != Some(assignee.as_str()) {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !task.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        matches_query(task, &self.query)
    }

    /// Short description of the active filters for the status bar.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.query.trim().is_empty() {
            parts.push(format!("'{}'", self.query.trim()));
        }
        if let Some(a) = &self.assignee {
            parts.push(format!("@{a}"));
        }
        if let Some(p) = self.priority {
            parts.push(format!("!{}", p.label()));
        }
        if let Some(t) = &self.tag {
            parts.push(format!("#{t}"));
        }
        parts.join(" ")
    }
}

/// Case-insensitive substring match over title, description, assignee name
/// and tags. An empty query matches everything.
pub fn matches_query(task: &Task, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle)
        || task
            .assignee_name()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
        || task.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
}

/// Project the columns through the criteria. Column identity, titles,
/// flags and task order are preserved; only task lists shrink.
pub fn filter_columns(columns: &[Column], criteria: &FilterCriteria) -> Vec<Column> {
    if criteria.is_empty() {
        return columns.to_vec();
    }
    columns
        .iter()
        .map(|column| Column {
            tasks: column
                .tasks
                .iter()
                .filter(|t| criteria.matches(t))
                .cloned()
                .collect(),
            ..column.clone()
        })
        .collect()
}

/// Distinct assignees, one per name, sorted by name.
pub fn assignees(columns: &[Column]) -> Vec<Assignee> {
    let mut by_name: BTreeMap<&str, &Assignee> = BTreeMap::new();
    for task in columns.iter().flat_map(|c| &c.tasks) {
        if let Some(a) = &task.assignee {
            by_name.entry(a.name.as_str()).or_insert(a);
        }
    }
    by_name.into_values().cloned().collect()
}

/// Distinct tags across the board.
pub fn tags(columns: &[Column]) -> BTreeSet<String> {
    columns
        .iter()
        .flat_map(|c| &c.tasks)
        .flat_map(|t| t.tags.iter().cloned())
        .collect()
}

/// Distinct priorities in use.
pub fn priorities(columns: &[Column]) -> BTreeSet<Priority> {
    columns
        .iter()
        .flat_map(|c| &c.tasks)
        .map(|t| t.priority)
        .collect()
}

/// Pick the value after `current` from `options`, wrapping through `None`.
///
/// Used by the filter controls to cycle through the facet values.
pub fn cycle_option<T: Clone + PartialEq>(options: &[T], current: Option<&T>) -> Option<T> {
    match current {
        None => options.first().cloned(),
        Some(value) => {
            let pos = options.iter().position(|o| o == value)?;
            options.get(pos + 1).cloned()
        }
    }
}

/// Holds typed search text back until input has been quiet for `delay`.
///
/// New input supersedes any pending text and restarts the delay.
#[derive(Debug, Clone)]
pub struct SearchDebounce {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record new query text typed at `now`.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Return the pending text once the delay has elapsed since the last
    /// input, clearing it.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(text, _)| text)
            }
            _ => None,
        }
    }

    /// Return the pending text immediately, if any.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(text, _)| text)
    }

    /// Drop any pending text.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::{column, task};
    use rstest::{fixture, rstest};

    #[fixture]
    fn columns() -> Vec<Column> {
        let mut login = task("t1", "Fix login bug", "todo");
        login.tags = vec!["A11y".into()];
        login.priority = Priority::High;
        login.assignee = Some(Assignee::new("Ada"));

        let mut billing = task("t2", "Invoice export", "todo");
        billing.description = "Billing CSV is off by one".into();
        billing.assignee = Some(Assignee::new("Grace"));

        let mut review = column("review", "Review", &[]);
        let mut styled = task("t3", "Polish cards", "review");
        styled.tags = vec!["ui".into(), "A11y".into()];
        review.tasks.push(styled);

        let mut todo = column("todo", "To Do", &[]);
        todo.tasks = vec![login, billing];
        todo.wip_limit = Some(1);
        vec![todo, review]
    }

    fn ids(columns: &[Column]) -> Vec<Vec<&str>> {
        columns
            .iter()
            .map(|c| c.tasks.iter().map(|t| t.id.as_str()).collect())
            .collect()
    }

    #[rstest]
    #[case("login", true)]
    #[case("LOGIN", true)]
    #[case("billing", false)]
    #[case("a11y", true)]
    #[case("ada", true)]
    #[case("", true)]
    fn test_query_against_login_task(columns: Vec<Column>, #[case] query: &str, #[case] expected: bool) {
        let login = &columns[0].tasks[0];
        assert_eq!(matches_query(login, query), expected);
    }

    #[rstest]
    fn test_description_matches(columns: Vec<Column>) {
        assert!(matches_query(&columns[0].tasks[1], "billing"));
    }

    #[rstest]
    fn test_assignee_filter_excludes_despite_query_match(columns: Vec<Column>) {
        let criteria = FilterCriteria {
            query: "login".into(),
            assignee: Some("Grace".into()),
            ..Default::default()
        };
        assert!(!criteria.matches(&columns[0].tasks[0]));
    }

    #[rstest]
    fn test_filter_preserves_columns_and_order(columns: Vec<Column>) {
        let criteria = FilterCriteria {
            tag: Some("A11y".into()),
            ..Default::default()
        };
        let view = filter_columns(&columns, &criteria);
        assert_eq!(ids(&view), vec![vec!["t1"], vec!["t3"]]);
        assert_eq!(view[0].id, "todo");
        assert_eq!(view[0].wip_limit, Some(1));
        assert_eq!(view[1].title, "Review");
        assert_eq!(columns[0].tasks.len(), 2);
    }

    #[rstest]
    fn test_priority_filter(columns: Vec<Column>) {
        let criteria = FilterCriteria {
            priority: Some(Priority::Medium),
            ..Default::default()
        };
        assert_eq!(ids(&filter_columns(&columns, &criteria)), vec![vec!["t2"], vec!["t3"]]);
    }

    #[rstest]
    fn test_tag_filter_is_exact(columns: Vec<Column>) {
        let criteria = FilterCriteria {
            tag: Some("a11y".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_columns(&columns, &criteria)), vec![Vec::<&str>::new(), vec![]]);
    }

    #[rstest]
    fn test_facets(columns: Vec<Column>) {
        let names: Vec<_> = assignees(&columns).into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
        assert_eq!(
            tags(&columns).into_iter().collect::<Vec<_>>(),
            vec!["A11y".to_string(), "ui".to_string()]
        );
        assert_eq!(
            priorities(&columns).into_iter().collect::<Vec<_>>(),
            vec![Priority::Medium, Priority::High]
        );
    }

    #[test]
    fn test_cycle_option_wraps_through_none() {
        let opts = vec!["a", "b"];
        assert_eq!(cycle_option(&opts, None), Some("a"));
        assert_eq!(cycle_option(&opts, Some(&"a")), Some("b"));
        assert_eq!(cycle_option(&opts, Some(&"b")), None);
        assert_eq!(cycle_option(&opts, Some(&"gone")), None);
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debounce = SearchDebounce::new(Duration::from_millis(300));
        debounce.input("lo", start);
        assert_eq!(debounce.poll(start + Duration::from_millis(100)), None);
        debounce.input("login", start + Duration::from_millis(200));
        assert_eq!(debounce.poll(start + Duration::from_millis(400)), None);
        assert_eq!(
            debounce.poll(start + Duration::from_millis(500)),
            Some("login".to_string())
        );
        assert!(!debounce.is_pending());
        assert_eq!(debounce.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_debounce_flush_and_cancel() {
        let now = Instant::now();
        let mut debounce = SearchDebounce::new(Duration::from_millis(300));
        debounce.input("abc", now);
        assert_eq!(debounce.flush(), Some("abc".to_string()));
        debounce.input("xyz", now);
        debounce.cancel();
        assert_eq!(debounce.poll(now + Duration::from_secs(1)), None);
    }
}

//! Pointer drag state machine.
//!
//! ```text
//! Idle --start(task)--> Dragging(task) --end(target)--> Idle
//!                          |    ^
//!                          +----+ over(target): preview move
//! ```
//!
//! A preview move is a real store mutation: when the pointer crosses into a
//! different column, the active task is moved to the tail of that column
//! straight away, so the board always shows where the card would land.
//! Ending a drag reorders within the column only when released on a task of
//! the same column. Releasing anywhere else keeps the last preview; there is
//! no rollback to the column the drag started in.
//!
//! Handlers always resolve the active task against the board they are given
//! at event time, never against the snapshot taken at `start`.

use tracing::{debug, trace};

use crate::board::Board;
use crate::task::Task;

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragTarget {
    Column(String),
    Task(String),
    Nothing,
}

/// Drag machine state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        task_id: String,
        /// Snapshot for the overlay; never used for index arithmetic.
        active: Task,
    },
}

/// How a drag ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The task was reordered within its current column.
    Reordered { column_id: String, from: usize, to: usize },
    /// Released without a same-column task target; the last preview stands.
    Dropped { column_id: String },
    /// No drag was in progress, or the active task vanished mid-drag.
    Ignored,
}

#[derive(Debug, Default)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The task being dragged, for overlay rendering.
    pub fn active_task(&self) -> Option<&Task> {
        match &self.state {
            DragState::Dragging { active, .. } => Some(active),
            DragState::Idle => None,
        }
    }

    /// Pick up a task. Stays idle if the task cannot be resolved.
    pub fn start(&mut self, board: &Board, task_id: &str) -> bool {
        let Some(task) = board.task(task_id) else {
            trace!(task = task_id, "drag start on unknown task ignored");
            return false;
        };
        debug!(task = task_id, column = %task.column_id, "drag started");
        self.state = DragState::Dragging {
            task_id: task_id.to_string(),
            active: task.clone(),
        };
        true
    }

    /// Pointer moved over `target`. Commits a preview move to the board when
    /// the target belongs to a different column than the active task.
    ///
    /// Returns whether the board changed.
    pub fn over(&mut self, board: &mut Board, target: &DragTarget) -> bool {
        let DragState::Dragging { task_id, active } = &mut self.state else {
            return false;
        };
        let Some(loc) = board.find_task(task_id) else {
            return false;
        };
        let source_id = board.columns()[loc.column_index].id.clone();
        let Some(dest_id) = target_column(board, target) else {
            return false;
        };
        if dest_id == source_id {
            return false;
        }

        let tail = board.column(&dest_id).map_or(0, |c| c.tasks.len());
        if !board.move_across_columns(&source_id, &dest_id, loc.task_index, tail) {
            return false;
        }
        active.column_id = dest_id.clone();
        debug!(task = %task_id, from = %source_id, to = %dest_id, "drag preview move");
        true
    }

    /// Pointer released over `target`. Always returns the machine to idle.
    pub fn end(&mut self, board: &mut Board, target: &DragTarget) -> DragOutcome {
        let DragState::Dragging { task_id, .. } = std::mem::take(&mut self.state) else {
            return DragOutcome::Ignored;
        };
        let Some(loc) = board.find_task(&task_id) else {
            return DragOutcome::Ignored;
        };
        let column_id = board.columns()[loc.column_index].id.clone();

        if let DragTarget::Task(over_id) = target {
            if let Some(over) = board.find_task(over_id) {
                if over.column_index == loc.column_index
                    && board.reorder_within_column(&column_id, loc.task_index, over.task_index)
                {
                    debug!(task = %task_id, column = %column_id, from = loc.task_index, to = over.task_index, "drag reordered");
                    return DragOutcome::Reordered {
                        column_id,
                        from: loc.task_index,
                        to: over.task_index,
                    };
                }
            }
        }
        debug!(task = %task_id, column = %column_id, "drag dropped");
        DragOutcome::Dropped { column_id }
    }
}

/// Resolve a target to the column it belongs to on the current board.
fn target_column(board: &Board, target: &DragTarget) -> Option<String> {
    match target {
        DragTarget::Column(id) => board.column(id).map(|c| c.id.clone()),
        DragTarget::Task(id) => board.task(id).map(|t| t.column_id.clone()),
        DragTarget::Nothing => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board;
    use rstest::rstest;

    fn ids(board: &Board, column_id: &str) -> Vec<String> {
        board
            .column(column_id)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    fn col(id: &str) -> DragTarget {
        DragTarget::Column(id.into())
    }

    fn over_task(id: &str) -> DragTarget {
        DragTarget::Task(id.into())
    }

    #[rstest]
    fn test_start_unknown_task_stays_idle(board: Board) {
        let mut drag = DragMachine::new();
        assert!(!drag.start(&board, "nope"));
        assert_eq!(drag.state(), &DragState::Idle);
        assert!(drag.active_task().is_none());
    }

    #[rstest]
    fn test_over_other_column_previews_to_tail(mut board: Board) {
        let mut drag = DragMachine::new();
        drag.start(&board, "t1");
        assert!(drag.over(&mut board, &col("done")));
        assert_eq!(ids(&board, "todo"), vec!["t2", "t3"]);
        assert_eq!(ids(&board, "done"), vec!["t5", "t6", "t1"]);
        assert_eq!(board.task("t1").unwrap().column_id, "done");
        assert_eq!(drag.active_task().unwrap().column_id, "done");
        board.validate().unwrap();
    }

    #[rstest]
    fn test_over_task_in_other_column_uses_its_column(mut board: Board) {
        let mut drag = DragMachine::new();
        drag.start(&board, "t2");
        assert!(drag.over(&mut board, &over_task("t4")));
        assert_eq!(ids(&board, "doing"), vec!["t4", "t2"]);
    }

    #[rstest]
    fn test_preview_move_is_idempotent(mut board: Board) {
        let mut drag = DragMachine::new();
        drag.start(&board, "t1");
        drag.over(&mut board, &col("doing"));
        let after_first = board.clone();
        assert!(!drag.over(&mut board, &col("doing")));
        assert!(!drag.over(&mut board, &over_task("t4")));
        assert_eq!(board, after_first);
    }

    #[rstest]
    fn test_over_same_column_does_nothing(mut board: Board) {
        let before = board.clone();
        let mut drag = DragMachine::new();
        drag.start(&board, "t1");
        assert!(!drag.over(&mut board, &over_task("t3")));
        assert!(!drag.over(&mut board, &DragTarget::Nothing));
        assert_eq!(board, before);
    }

    #[rstest]
    fn test_end_on_same_column_task_reorders(mut board: Board) {
        let mut drag = DragMachine::new();
        drag.start(&board, "t1");
        let outcome = drag.end(&mut board, &over_task("t3"));
        assert_eq!(
            outcome,
            DragOutcome::Reordered { column_id: "todo".into(), from: 0, to: 2 }
        );
        assert_eq!(ids(&board, "todo"), vec!["t2", "t3", "t1"]);
        assert!(!drag.is_dragging());
    }

    #[rstest]
    fn test_preview_then_reorder_in_destination(mut board: Board) {
        let mut drag = DragMachine::new();
        drag.start(&board, "t3");
        drag.over(&mut board, &col("done"));
        drag.over(&mut board, &over_task("t5"));
        let outcome = drag.end(&mut board, &over_task("t5"));
        assert_eq!(
            outcome,
            DragOutcome::Reordered { column_id: "done".into(), from: 2, to: 0 }
        );
        assert_eq!(ids(&board, "done"), vec!["t3", "t5", "t6"]);
        board.validate().unwrap();
    }

    #[rstest]
    fn test_release_outside_keeps_last_preview(mut board: Board) {
        let mut drag = DragMachine::new();
        drag.start(&board, "t1");
        drag.over(&mut board, &col("doing"));
        let outcome = drag.end(&mut board, &DragTarget::Nothing);
        assert_eq!(outcome, DragOutcome::Dropped { column_id: "doing".into() });
        assert_eq!(ids(&board, "doing"), vec!["t4", "t1"]);
        assert_eq!(ids(&board, "todo"), vec!["t2", "t3"]);
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[rstest]
    fn test_end_on_other_column_task_does_not_move(mut board: Board) {
        let before = board.clone();
        let mut drag = DragMachine::new();
        drag.start(&board, "t1");
        let outcome = drag.end(&mut board, &over_task("t5"));
        assert_eq!(outcome, DragOutcome::Dropped { column_id: "todo".into() });
        assert_eq!(board, before);
    }

    #[rstest]
    fn test_handlers_read_current_board(mut board: Board) {
        let mut drag = DragMachine::new();
        drag.start(&board, "t3");
        // Board changes under the drag: t3 moves to index 0.
        board.reorder_within_column("todo", 2, 0);
        drag.over(&mut board, &col("doing"));
        assert_eq!(ids(&board, "todo"), vec!["t1", "t2"]);
        assert_eq!(ids(&board, "doing"), vec!["t4", "t3"]);
    }

    #[rstest]
    fn test_end_when_idle_is_ignored(mut board: Board) {
        let mut drag = DragMachine::new();
        assert_eq!(drag.end(&mut board, &over_task("t1")), DragOutcome::Ignored);
    }

    #[rstest]
    fn test_active_task_deleted_mid_drag(mut board: Board) {
        let mut drag = DragMachine::new();
        drag.start(&board, "t4");
        board.delete_task("t4");
        assert!(!drag.over(&mut board, &col("todo")));
        assert_eq!(drag.end(&mut board, &DragTarget::Nothing), DragOutcome::Ignored);
        assert!(!drag.is_dragging());
    }
}

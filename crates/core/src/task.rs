//! Task status state machine and checklist progress.
//!
//! Status changes go through [`TaskStatus::validate_transition`] rather than
//! free-form assignment. Entering `completed` is the only transition with
//! side effects (completion timestamp, point award, creator notification);
//! those are orchestrated by the caller, this module only answers whether a
//! change is legal and what progress value results from it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Smallest allowed story point estimate.
pub const MIN_STORY_POINTS: i32 = 1;

/// Largest allowed story point estimate.
pub const MAX_STORY_POINTS: i32 = 13;

/// Story points assigned when the client does not estimate.
pub const DEFAULT_STORY_POINTS: i32 = 1;

define_str_enum! {
    /// Task workflow status.
    TaskStatus {
        Backlog => "backlog",
        Todo => "todo",
        InProgress => "in-progress",
        InReview => "in-review",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

define_str_enum! {
    /// Kind of work a task represents.
    TaskCategory {
        Bug => "bug",
        Feature => "feature",
        Improvement => "improvement",
        Documentation => "documentation",
        Testing => "testing",
        Other => "other",
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl Default for TaskCategory {
    fn default() -> Self {
        Self::Other
    }
}

impl TaskStatus {
    /// The board columns a task moves between before it is finished.
    pub fn is_working(self) -> bool {
        matches!(
            self,
            Self::Backlog | Self::Todo | Self::InProgress | Self::InReview
        )
    }

    /// Whether a task in `self` may move to `next`.
    ///
    /// Working states move freely among themselves. `completed` is reachable
    /// from working states only; `cancelled` from anything not completed.
    /// Both terminal states can be reopened into a working state.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        if self == next {
            return true;
        }
        match (self, next) {
            (_, n) if n.is_working() => true,
            (from, Self::Completed) => from.is_working(),
            (from, Self::Cancelled) => from != Self::Completed,
            _ => false,
        }
    }

    /// Validate a transition, returning a validation error when illegal.
    pub fn validate_transition(self, next: TaskStatus) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Cannot move task from '{self}' to '{next}'"
            )))
        }
    }
}

/// A validated status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl StatusChange {
    /// Validate and build a status change.
    pub fn new(from: TaskStatus, to: TaskStatus) -> Result<Self, CoreError> {
        from.validate_transition(to)?;
        Ok(Self { from, to })
    }

    /// True when this change moves the task into `completed`.
    pub fn enters_completed(&self) -> bool {
        self.from != TaskStatus::Completed && self.to == TaskStatus::Completed
    }
}

/// One entry in a task's checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

/// Percentage of checklist items completed, or `None` for an empty checklist.
pub fn checklist_progress(items: &[ChecklistItem]) -> Option<i32> {
    if items.is_empty() {
        return None;
    }
    let done = items.iter().filter(|item| item.completed).count();
    Some(percentage(done as i64, items.len() as i64))
}

/// Rounded percentage `part / whole * 100`; 0 when `whole` is 0.
pub fn percentage(part: i64, whole: i64) -> i32 {
    if whole <= 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as i32
}

/// Resolve the stored progress value for a task.
///
/// A completed task is always at 100. Otherwise a non-empty checklist wins
/// over any manually supplied value, which is clamped to 0..=100.
pub fn derive_progress(status: TaskStatus, checklist: &[ChecklistItem], manual: i32) -> i32 {
    if status == TaskStatus::Completed {
        return 100;
    }
    checklist_progress(checklist).unwrap_or_else(|| manual.clamp(0, 100))
}

/// Stamp `completed_at` on checklist items.
///
/// Client-supplied timestamps are ignored. An item that was already
/// completed at the same position with the same text keeps its original
/// timestamp; a newly completed item gets `now`; open items get none.
pub fn stamp_checklist(
    previous: &[ChecklistItem],
    next: Vec<ChecklistItem>,
    now: Timestamp,
) -> Vec<ChecklistItem> {
    next.into_iter()
        .enumerate()
        .map(|(idx, mut item)| {
            item.completed_at = if item.completed {
                previous
                    .get(idx)
                    .filter(|prev| prev.completed && prev.text == item.text)
                    .and_then(|prev| prev.completed_at)
                    .or(Some(now))
            } else {
                None
            };
            item
        })
        .collect()
}

/// A task is overdue when its due date has passed and it is not completed.
pub fn is_overdue(due_date: Option<Timestamp>, status: TaskStatus, now: Timestamp) -> bool {
    match due_date {
        Some(due) => status != TaskStatus::Completed && now > due,
        None => false,
    }
}

/// Reject dependency lists that reference the task itself.
pub fn validate_references(
    task_id: Option<DbId>,
    dependencies: &[DbId],
    blocked_by: &[DbId],
) -> Result<(), CoreError> {
    if let Some(id) = task_id {
        if dependencies.contains(&id) || blocked_by.contains(&id) {
            return Err(CoreError::Validation(
                "A task cannot depend on or be blocked by itself".into(),
            ));
        }
    }
    Ok(())
}

/// Validate the story point estimate range.
pub fn validate_story_points(points: i32) -> Result<(), CoreError> {
    if (MIN_STORY_POINTS..=MAX_STORY_POINTS).contains(&points) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Story points must be between {MIN_STORY_POINTS} and {MAX_STORY_POINTS}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    fn item(text: &str, completed: bool) -> ChecklistItem {
        ChecklistItem {
            text: text.to_string(),
            completed,
            completed_at: None,
        }
    }

    // -- Transitions ----------------------------------------------------------

    #[test]
    fn working_states_move_freely() {
        for from in TaskStatus::ALL.iter().copied().filter(|s| s.is_working()) {
            for to in TaskStatus::ALL.iter().copied().filter(|s| s.is_working()) {
                assert!(from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn todo_can_complete_directly() {
        let change = StatusChange::new(TaskStatus::Todo, TaskStatus::Completed).unwrap();
        assert!(change.enters_completed());
    }

    #[test]
    fn cancelled_reachable_from_any_non_completed_state() {
        for from in TaskStatus::ALL {
            let allowed = from.can_transition_to(TaskStatus::Cancelled);
            assert_eq!(allowed, *from != TaskStatus::Completed, "{from} -> cancelled");
        }
    }

    #[test]
    fn cancelled_must_reopen_before_completing() {
        assert_matches!(
            TaskStatus::Cancelled.validate_transition(TaskStatus::Completed),
            Err(CoreError::Validation(_))
        );
        assert!(TaskStatus::Cancelled.can_transition_to(TaskStatus::Todo));
    }

    #[test]
    fn completed_can_reopen_but_not_cancel() {
        assert!(TaskStatus::Completed.can_transition_to(TaskStatus::InProgress));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Cancelled));
    }

    #[test]
    fn staying_completed_is_not_entering_completed() {
        let change = StatusChange::new(TaskStatus::Completed, TaskStatus::Completed).unwrap();
        assert!(!change.enters_completed());
    }

    #[test]
    fn hyphenated_statuses_round_trip_through_json() {
        let json = serde_json::to_string(&TaskStatus::InReview).unwrap();
        assert_eq!(json, "\"in-review\"");
        let parsed: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }

    // -- Progress -------------------------------------------------------------

    #[test]
    fn empty_checklist_has_no_progress() {
        assert_eq!(checklist_progress(&[]), None);
    }

    #[test]
    fn checklist_progress_rounds() {
        let items = vec![item("a", true), item("b", false), item("c", false)];
        assert_eq!(checklist_progress(&items), Some(33));
        let items = vec![item("a", true), item("b", true), item("c", false)];
        assert_eq!(checklist_progress(&items), Some(67));
    }

    #[test]
    fn completed_task_is_always_full() {
        let items = vec![item("a", false)];
        assert_eq!(derive_progress(TaskStatus::Completed, &items, 10), 100);
    }

    #[test]
    fn checklist_overrides_manual_progress() {
        let items = vec![item("a", true), item("b", false)];
        assert_eq!(derive_progress(TaskStatus::InProgress, &items, 90), 50);
    }

    #[test]
    fn manual_progress_is_clamped() {
        assert_eq!(derive_progress(TaskStatus::Todo, &[], 140), 100);
        assert_eq!(derive_progress(TaskStatus::Todo, &[], -5), 0);
        assert_eq!(derive_progress(TaskStatus::Todo, &[], 40), 40);
    }

    #[test]
    fn percentage_of_nothing_is_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 2), 50);
    }

    // -- Checklist stamping ---------------------------------------------------

    #[test]
    fn stamping_keeps_existing_timestamps() {
        let earlier = Utc::now() - Duration::hours(3);
        let now = Utc::now();
        let previous = vec![ChecklistItem {
            text: "write docs".into(),
            completed: true,
            completed_at: Some(earlier),
        }];
        let next = vec![item("write docs", true), item("ship", true), item("tidy", false)];

        let stamped = stamp_checklist(&previous, next, now);

        assert_eq!(stamped[0].completed_at, Some(earlier));
        assert_eq!(stamped[1].completed_at, Some(now));
        assert_eq!(stamped[2].completed_at, None);
    }

    #[test]
    fn stamping_ignores_client_timestamps() {
        let now = Utc::now();
        let forged = ChecklistItem {
            text: "x".into(),
            completed: false,
            completed_at: Some(now - Duration::days(30)),
        };
        let stamped = stamp_checklist(&[], vec![forged], now);
        assert_eq!(stamped[0].completed_at, None);
    }

    // -- Overdue / validation -------------------------------------------------

    #[test]
    fn overdue_only_for_open_tasks_past_due() {
        let now = Utc::now();
        let past = Some(now - Duration::minutes(1));
        assert!(is_overdue(past, TaskStatus::InProgress, now));
        assert!(is_overdue(past, TaskStatus::Cancelled, now));
        assert!(!is_overdue(past, TaskStatus::Completed, now));
        assert!(!is_overdue(None, TaskStatus::Todo, now));
    }

    #[test]
    fn self_reference_is_rejected() {
        assert!(validate_references(Some(7), &[1, 7], &[]).is_err());
        assert!(validate_references(Some(7), &[], &[7]).is_err());
        assert!(validate_references(Some(7), &[1, 2], &[3]).is_ok());
        assert!(validate_references(None, &[1], &[1]).is_ok());
    }

    #[test]
    fn story_point_bounds() {
        assert!(validate_story_points(1).is_ok());
        assert!(validate_story_points(13).is_ok());
        assert!(validate_story_points(0).is_err());
        assert!(validate_story_points(14).is_err());
    }
}

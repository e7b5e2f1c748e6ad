//! Per-user dashboard aggregation.
//!
//! The caller loads the projects a user owns or belongs to and every task in
//! those projects. [`DashboardStats::compute`] splits the tasks into those
//! assigned to the user and the rest, counts them, and picks the most
//! recently active tasks across the whole set.

use serde::Serialize;

use crate::project::ProjectStatus;
use crate::task::{self, TaskStatus};
use crate::types::{DbId, Timestamp};

/// Number of tasks returned in `recent_activity`.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// The task fields the dashboard needs.
pub trait ActivityTask {
    fn assigned_to(&self) -> Option<DbId>;
    fn status(&self) -> TaskStatus;
    fn due_date(&self) -> Option<Timestamp>;
    fn last_activity_at(&self) -> Timestamp;
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats<T> {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_tasks: usize,
    pub my_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    pub recent_activity: Vec<T>,
}

impl<T: ActivityTask> DashboardStats<T> {
    pub fn compute(
        user_id: DbId,
        project_statuses: &[ProjectStatus],
        mut tasks: Vec<T>,
        now: Timestamp,
    ) -> Self {
        let count_projects =
            |wanted: ProjectStatus| project_statuses.iter().filter(|s| **s == wanted).count();

        let mine: Vec<&T> = tasks
            .iter()
            .filter(|t| t.assigned_to() == Some(user_id))
            .collect();
        let completed_tasks = mine
            .iter()
            .filter(|t| t.status() == TaskStatus::Completed)
            .count();
        let overdue_tasks = mine
            .iter()
            .filter(|t| task::is_overdue(t.due_date(), t.status(), now))
            .count();
        let my_tasks = mine.len();

        let total_tasks = tasks.len();
        tasks.sort_by(|a, b| b.last_activity_at().cmp(&a.last_activity_at()));
        tasks.truncate(RECENT_ACTIVITY_LIMIT);

        Self {
            total_projects: project_statuses.len(),
            active_projects: count_projects(ProjectStatus::Active),
            completed_projects: count_projects(ProjectStatus::Completed),
            total_tasks,
            my_tasks,
            completed_tasks,
            pending_tasks: my_tasks - completed_tasks,
            overdue_tasks,
            recent_activity: tasks,
        }
    }
}

//! Denormalized statistics rollups for projects and teams.
//!
//! Callers load the child rows (task statuses, project statuses, member
//! points) and pass them in; the rollup is plain arithmetic so it can be
//! tested without a database. Persisting the result is the caller's job.

use serde::Serialize;

use crate::project::ProjectStatus;
use crate::task::{percentage, TaskStatus};

/// Rounded completion percentage; 0 when there are no tasks.
pub fn progress_pct(completed: i64, total: i64) -> i32 {
    percentage(completed, total)
}

/// Cached counters stored on a project row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectRollup {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub total_members: i64,
    pub progress: i32,
}

impl ProjectRollup {
    pub fn compute<I>(task_statuses: I, total_members: i64) -> Self
    where
        I: IntoIterator<Item = TaskStatus>,
    {
        let (total_tasks, completed_tasks) =
            task_statuses
                .into_iter()
                .fold((0i64, 0i64), |(total, done), status| {
                    let done = done + i64::from(status == TaskStatus::Completed);
                    (total + 1, done)
                });
        Self {
            total_tasks,
            completed_tasks,
            total_members,
            progress: progress_pct(completed_tasks, total_tasks),
        }
    }
}

/// Cached counters stored on a team row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamRollup {
    pub total_projects: i64,
    pub completed_projects: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub total_points: i64,
}

impl TeamRollup {
    pub fn compute<P, T, M>(project_statuses: P, task_statuses: T, member_points: M) -> Self
    where
        P: IntoIterator<Item = ProjectStatus>,
        T: IntoIterator<Item = TaskStatus>,
        M: IntoIterator<Item = i64>,
    {
        let mut rollup = Self::default();
        for status in project_statuses {
            rollup.total_projects += 1;
            if status == ProjectStatus::Completed {
                rollup.completed_projects += 1;
            }
        }
        for status in task_statuses {
            rollup.total_tasks += 1;
            if status == TaskStatus::Completed {
                rollup.completed_tasks += 1;
            }
        }
        rollup.total_points = member_points.into_iter().sum();
        rollup
    }
}

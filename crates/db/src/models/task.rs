//! Task entity model and DTOs.

use collabspace_core::dashboard::ActivityTask;
use collabspace_core::priority::Priority;
use collabspace_core::task::{self, ChecklistItem, TaskCategory, TaskStatus};
use collabspace_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub project_id: DbId,
    pub assigned_to: Option<DbId>,
    pub created_by: DbId,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    #[sqlx(try_from = "String")]
    pub category: TaskCategory,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: f64,
    pub story_points: i32,
    pub dependencies: Vec<DbId>,
    pub blocked_by: Vec<DbId>,
    #[sqlx(json)]
    pub checklist: Vec<ChecklistItem>,
    pub tags: Vec<String>,
    pub progress: i32,
    pub comments_count: i64,
    pub last_activity_at: Timestamp,
    pub last_activity_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        task::is_overdue(self.due_date, self.status, now)
    }

    /// Wrap with derived fields for API responses.
    pub fn into_detail(self, now: Timestamp) -> TaskDetail {
        let is_overdue = self.is_overdue(now);
        TaskDetail {
            task: self,
            is_overdue,
        }
    }
}

impl ActivityTask for Task {
    fn assigned_to(&self) -> Option<DbId> {
        self.assigned_to
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    fn due_date(&self) -> Option<Timestamp> {
        self.due_date
    }

    fn last_activity_at(&self) -> Timestamp {
        self.last_activity_at
    }
}

/// A task plus its derived `is_overdue` flag.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub is_overdue: bool,
}

/// DTO for inserting a task. Derived fields are resolved by the caller.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub project_id: DbId,
    pub assigned_to: Option<DbId>,
    pub created_by: DbId,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: TaskCategory,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: f64,
    pub story_points: i32,
    pub dependencies: Vec<DbId>,
    pub blocked_by: Vec<DbId>,
    pub checklist: Vec<ChecklistItem>,
    pub tags: Vec<String>,
    pub progress: i32,
}

/// Full set of client-writable task columns, written back after a patch
/// has been applied to the loaded row.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<DbId>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: TaskCategory,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: f64,
    pub story_points: i32,
    pub dependencies: Vec<DbId>,
    pub blocked_by: Vec<DbId>,
    pub checklist: Vec<ChecklistItem>,
    pub tags: Vec<String>,
    pub progress: i32,
    pub last_activity_by: DbId,
}

impl TaskChanges {
    /// Start from the current state of a task.
    pub fn from_task(task: &Task, actor_id: DbId) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            assigned_to: task.assigned_to,
            status: task.status,
            priority: task.priority,
            category: task.category,
            start_date: task.start_date,
            due_date: task.due_date,
            estimated_hours: task.estimated_hours,
            actual_hours: task.actual_hours,
            story_points: task.story_points,
            dependencies: task.dependencies.clone(),
            blocked_by: task.blocked_by.clone(),
            checklist: task.checklist.clone(),
            tags: task.tags.clone(),
            progress: task.progress,
            last_activity_by: actor_id,
        }
    }
}

/// Optional filters for listing tasks. Results are always restricted to
/// `visible_projects`.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub visible_projects: Vec<DbId>,
    pub project_id: Option<DbId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<DbId>,
}

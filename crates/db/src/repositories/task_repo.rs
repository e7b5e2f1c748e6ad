//! Repository for the `tasks` table.

use collabspace_core::task::TaskStatus;
use collabspace_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::decode_error;
use crate::models::task::{CreateTask, Task, TaskChanges, TaskFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, project_id, assigned_to, created_by, status, \
    priority, category, start_date, due_date, completed_at, estimated_hours, actual_hours, \
    story_points, dependencies, blocked_by, checklist, tags, progress, comments_count, \
    last_activity_at, last_activity_by, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, project_id, assigned_to, created_by, status,
                priority, category, start_date, due_date, completed_at, estimated_hours,
                actual_hours, story_points, dependencies, blocked_by, checklist, tags, progress,
                last_activity_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.project_id)
            .bind(input.assigned_to)
            .bind(input.created_by)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.category.as_str())
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(input.completed_at)
            .bind(input.estimated_hours)
            .bind(input.actual_hours)
            .bind(input.story_points)
            .bind(&input.dependencies)
            .bind(&input.blocked_by)
            .bind(Json(&input.checklist))
            .bind(&input.tags)
            .bind(input.progress)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks within the filter's visible projects, newest first.
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE project_id = ANY($1)
               AND ($2::BIGINT IS NULL OR project_id = $2)
               AND ($3::TEXT IS NULL OR status = $3)
               AND ($4::TEXT IS NULL OR priority = $4)
               AND ($5::BIGINT IS NULL OR assigned_to = $5)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&filter.visible_projects)
            .bind(filter.project_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(filter.assigned_to)
            .fetch_all(pool)
            .await
    }

    /// Every task belonging to any of the given projects.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE project_id = ANY($1)");
        sqlx::query_as::<_, Task>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// Statuses of every task in the given projects.
    pub async fn statuses_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<TaskStatus>, sqlx::Error> {
        let raw: Vec<String> =
            sqlx::query_scalar("SELECT status FROM tasks WHERE project_id = ANY($1)")
                .bind(project_ids)
                .fetch_all(pool)
                .await?;
        raw.into_iter()
            .map(|s| TaskStatus::try_from(s).map_err(decode_error))
            .collect()
    }

    /// Write back the full set of client-writable columns.
    ///
    /// Also bumps `last_activity_at`. Returns `None` if the task is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = $2,
                description = $3,
                assigned_to = $4,
                status = $5,
                priority = $6,
                category = $7,
                start_date = $8,
                due_date = $9,
                estimated_hours = $10,
                actual_hours = $11,
                story_points = $12,
                dependencies = $13,
                blocked_by = $14,
                checklist = $15,
                tags = $16,
                progress = $17,
                last_activity_by = $18,
                last_activity_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.assigned_to)
            .bind(changes.status.as_str())
            .bind(changes.priority.as_str())
            .bind(changes.category.as_str())
            .bind(changes.start_date)
            .bind(changes.due_date)
            .bind(changes.estimated_hours)
            .bind(changes.actual_hours)
            .bind(changes.story_points)
            .bind(&changes.dependencies)
            .bind(&changes.blocked_by)
            .bind(Json(&changes.checklist))
            .bind(&changes.tags)
            .bind(changes.progress)
            .bind(changes.last_activity_by)
            .fetch_optional(pool)
            .await
    }

    /// Set `completed_at` if it has never been set.
    ///
    /// Returns `true` only for the caller that performed the first
    /// completion; concurrent or repeated completions get `false`.
    pub async fn claim_completion(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET completed_at = NOW() WHERE id = $1 AND completed_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recount non-deleted comments into `comments_count`, returning the new value.
    pub async fn refresh_comments_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE tasks SET comments_count = (
                SELECT COUNT(*) FROM comments WHERE task_id = $1 AND is_deleted = false)
             WHERE id = $1
             RETURNING comments_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every task of a project, returning how many were removed.
    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

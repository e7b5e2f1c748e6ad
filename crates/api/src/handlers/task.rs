//! Handlers for the `/tasks` resource.
//!
//! Reading requires access to the task's project; creating, updating and
//! deleting require a contributing role (viewers are read-only). Status
//! changes go through the transition rules in `collabspace_core::task`;
//! derived fields (progress, checklist timestamps, `completed_at`) are
//! computed here and never taken from the client.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use collabspace_core::error::CoreError;
use collabspace_core::priority::Priority;
use collabspace_core::task::{
    self, ChecklistItem, StatusChange, TaskCategory, TaskStatus, DEFAULT_STORY_POINTS,
};
use collabspace_core::types::{dedupe_ids, DbId, Timestamp};
use collabspace_db::models::task::{CreateTask, Task, TaskChanges, TaskDetail, TaskFilter};
use collabspace_db::repositories::{ProjectRepo, TaskRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{not_found, AppResult};
use crate::extract::{double_option, ValidatedJson};
use crate::handlers::project::{load_contributable, load_viewable};
use crate::middleware::auth::AuthUser;
use crate::query::TaskQuery;
use crate::response::{MessageResponse, ResourceResponse};
use crate::services::{stats, tasks};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Task title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    pub project_id: DbId,
    /// Absent assigns the task to its creator; `null` leaves it unassigned.
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<DbId>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: Option<TaskCategory>,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,
    #[validate(range(min = 0.0))]
    pub actual_hours: Option<f64>,
    #[validate(range(min = 1, max = 13, message = "Story points must be between 1 and 13"))]
    pub story_points: Option<i32>,
    pub dependencies: Option<Vec<DbId>>,
    pub blocked_by: Option<Vec<DbId>>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub tags: Option<Vec<String>>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
}

/// Allow-listed task fields. `null` on `assigned_to` unassigns; on any
/// other field it leaves the value unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Task title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<DbId>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: Option<TaskCategory>,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,
    #[validate(range(min = 0.0))]
    pub actual_hours: Option<f64>,
    #[validate(range(min = 1, max = 13, message = "Story points must be between 1 and 13"))]
    pub story_points: Option<i32>,
    pub dependencies: Option<Vec<DbId>>,
    pub blocked_by: Option<Vec<DbId>>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub tags: Option<Vec<String>>,
    /// Ignored while the task has a checklist or is completed.
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/tasks
///
/// Only tasks in projects the caller owns or belongs to are returned.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TaskQuery>,
) -> AppResult<Json<ResourceResponse<Vec<TaskDetail>>>> {
    let filter = TaskFilter {
        visible_projects: ProjectRepo::visible_ids(&state.pool, auth.user_id).await?,
        project_id: params.project,
        status: params.status,
        priority: params.priority,
        assigned_to: params.assigned_to,
    };
    let now = Utc::now();
    let tasks = TaskRepo::list(&state.pool, &filter)
        .await?
        .into_iter()
        .map(|t| t.into_detail(now))
        .collect();
    Ok(Json(ResourceResponse::new("tasks", tasks)))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<ResourceResponse<TaskDetail>>)> {
    load_contributable(&state, input.project_id, auth.user_id).await?;

    let assigned_to = input.assigned_to.unwrap_or(Some(auth.user_id));
    ensure_users_exist(&state, assigned_to).await?;

    let dependencies = dedupe_ids(input.dependencies.unwrap_or_default());
    let blocked_by = dedupe_ids(input.blocked_by.unwrap_or_default());
    task::validate_references(None, &dependencies, &blocked_by)?;

    let story_points = input.story_points.unwrap_or(DEFAULT_STORY_POINTS);
    task::validate_story_points(story_points)?;

    let now = Utc::now();
    let status = input.status.unwrap_or_default();
    let checklist = task::stamp_checklist(&[], input.checklist.unwrap_or_default(), now);
    let progress = task::derive_progress(status, &checklist, input.progress.unwrap_or(0));

    let created = TaskRepo::create(
        &state.pool,
        &CreateTask {
            title: input.title.trim().to_string(),
            description: input.description,
            project_id: input.project_id,
            assigned_to,
            created_by: auth.user_id,
            status,
            priority: input.priority.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            start_date: input.start_date,
            due_date: input.due_date,
            completed_at: (status == TaskStatus::Completed).then_some(now),
            estimated_hours: input.estimated_hours,
            actual_hours: input.actual_hours.unwrap_or(0.0),
            story_points,
            dependencies,
            blocked_by,
            checklist,
            tags: input.tags.unwrap_or_default(),
            progress,
        },
    )
    .await?;

    tracing::info!(task_id = created.id, project_id = created.project_id, "Task created");

    let task = tasks::after_task_saved(&state, None, created, auth.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ResourceResponse::new("task", task.into_detail(Utc::now()))
                .with_message("Task created successfully"),
        ),
    ))
}

/// GET /api/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ResourceResponse<TaskDetail>>> {
    let task = load_task(&state, id, auth.user_id, Access::View).await?;
    Ok(Json(ResourceResponse::new("task", task.into_detail(Utc::now()))))
}

/// PUT /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTaskRequest>,
) -> AppResult<Json<ResourceResponse<TaskDetail>>> {
    let current = load_task(&state, id, auth.user_id, Access::Contribute).await?;
    let changes = apply_update(&current, input, auth.user_id, Utc::now())?;
    ensure_users_exist(&state, changes.assigned_to).await?;

    let saved = TaskRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| not_found("Task", id))?;

    let task = tasks::after_task_saved(&state, Some(&current), saved, auth.user_id).await?;
    Ok(Json(
        ResourceResponse::new("task", task.into_detail(Utc::now()))
            .with_message("Task updated successfully"),
    ))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let task = load_task(&state, id, auth.user_id, Access::Contribute).await?;
    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(not_found("Task", id));
    }
    tracing::info!(task_id = id, project_id = task.project_id, "Task deleted");

    stats::recompute_project_stats(&state.pool, task.project_id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// What the caller intends to do with a loaded task.
#[derive(Debug, Clone, Copy)]
enum Access {
    View,
    Contribute,
}

/// Load a task and check the caller's access to its project.
async fn load_task(state: &AppState, id: DbId, user_id: DbId, access: Access) -> AppResult<Task> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Task", id))?;
    match access {
        Access::View => load_viewable(state, task.project_id, user_id).await?,
        Access::Contribute => load_contributable(state, task.project_id, user_id).await?,
    };
    Ok(task)
}

async fn ensure_users_exist(state: &AppState, assignee: Option<DbId>) -> AppResult<()> {
    if let Some(user_id) = assignee {
        if UserRepo::find_by_id(&state.pool, user_id).await?.is_none() {
            return Err(not_found("User", user_id));
        }
    }
    Ok(())
}

/// Apply an allow-listed patch to the current task state.
fn apply_update(
    current: &Task,
    input: UpdateTaskRequest,
    actor_id: DbId,
    now: Timestamp,
) -> Result<TaskChanges, CoreError> {
    let mut changes = TaskChanges::from_task(current, actor_id);

    if let Some(status) = input.status {
        changes.status = StatusChange::new(current.status, status)?.to;
    }
    if let Some(title) = input.title {
        changes.title = title.trim().to_string();
    }
    if let Some(description) = input.description {
        changes.description = Some(description);
    }
    if let Some(assigned_to) = input.assigned_to {
        changes.assigned_to = assigned_to;
    }
    if let Some(priority) = input.priority {
        changes.priority = priority;
    }
    if let Some(category) = input.category {
        changes.category = category;
    }
    if let Some(start_date) = input.start_date {
        changes.start_date = Some(start_date);
    }
    if let Some(due_date) = input.due_date {
        changes.due_date = Some(due_date);
    }
    if let Some(hours) = input.estimated_hours {
        changes.estimated_hours = Some(hours);
    }
    if let Some(hours) = input.actual_hours {
        changes.actual_hours = hours;
    }
    if let Some(points) = input.story_points {
        task::validate_story_points(points)?;
        changes.story_points = points;
    }
    if let Some(dependencies) = input.dependencies {
        changes.dependencies = dedupe_ids(dependencies);
    }
    if let Some(blocked_by) = input.blocked_by {
        changes.blocked_by = dedupe_ids(blocked_by);
    }
    task::validate_references(Some(current.id), &changes.dependencies, &changes.blocked_by)?;
    if let Some(checklist) = input.checklist {
        changes.checklist = task::stamp_checklist(&current.checklist, checklist, now);
    }
    if let Some(tags) = input.tags {
        changes.tags = tags;
    }

    // Leaving `completed` drops the forced 100 unless the client sends a value.
    let fallback = if current.status == TaskStatus::Completed {
        0
    } else {
        current.progress
    };
    let manual = input.progress.unwrap_or(fallback);
    changes.progress = task::derive_progress(changes.status, &changes.checklist, manual);
    Ok(changes)
}

//! Side effects that follow a task insert or update.
//!
//! The order is fixed: assignment notice, first-completion handling (claim,
//! award, creator notice), then the project stats recompute. Nothing is
//! rolled back if a later step fails.

use collabspace_core::notification::NotificationDraft;
use collabspace_core::task::TaskStatus;
use collabspace_core::types::DbId;
use collabspace_db::models::task::Task;
use collabspace_db::repositories::TaskRepo;

use crate::error::AppResult;
use crate::notifications::notify;
use crate::services::{gamification, stats};
use crate::state::AppState;

/// Run the side effects of saving `task`.
///
/// `previous` is the row as it was before an update, or `None` for a newly
/// created task. Returns the task as it stands after all side effects.
pub async fn after_task_saved(
    state: &AppState,
    previous: Option<&Task>,
    task: Task,
    actor_id: DbId,
) -> AppResult<Task> {
    if let Some(assignee) = newly_assigned(previous, &task) {
        let draft = NotificationDraft::task_assigned(
            assignee,
            actor_id,
            task.id,
            task.project_id,
            &task.title,
        );
        notify(state, draft).await?;
    }

    let task = if entered_completed(previous, &task) {
        handle_completion(state, task, actor_id).await?
    } else {
        task
    };

    stats::recompute_project_stats(&state.pool, task.project_id).await?;
    Ok(task)
}

/// The user to notify about an assignment, if the assignee changed.
fn newly_assigned(previous: Option<&Task>, task: &Task) -> Option<DbId> {
    let assignee = task.assigned_to?;
    match previous {
        Some(prev) if prev.assigned_to == Some(assignee) => None,
        _ => Some(assignee),
    }
}

/// Awards are tied to transitions, so a task created as completed never
/// enters this path.
fn entered_completed(previous: Option<&Task>, task: &Task) -> bool {
    previous.is_some_and(|prev| prev.status != TaskStatus::Completed)
        && task.status == TaskStatus::Completed
}

async fn handle_completion(state: &AppState, task: Task, actor_id: DbId) -> AppResult<Task> {
    if !TaskRepo::claim_completion(&state.pool, task.id).await? {
        tracing::debug!(task_id = task.id, "Task completed again, no award");
        return Ok(task);
    }

    tracing::info!(task_id = task.id, project_id = task.project_id, "Task completed");

    if let Some(assignee) = task.assigned_to {
        gamification::award_task_completion(state, assignee, task.story_points).await?;
    }

    notify(
        state,
        NotificationDraft::task_completed(
            task.created_by,
            actor_id,
            task.id,
            task.project_id,
            &task.title,
        ),
    )
    .await?;

    // Reload to pick up the claimed completed_at.
    let refreshed = TaskRepo::find_by_id(&state.pool, task.id).await?;
    Ok(refreshed.unwrap_or(task))
}

//! Handlers for the `/comments` resource.
//!
//! A comment targets exactly one task or project. Every operation requires
//! read access to the target's project; editing and deleting are further
//! reserved for the author.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use collabspace_core::access;
use collabspace_core::comment::{self, CommentTarget};
use collabspace_core::error::CoreError;
use collabspace_core::notification::NotificationDraft;
use collabspace_core::types::DbId;
use collabspace_db::models::comment::{Comment, CreateComment};
use collabspace_db::models::project::Project;
use collabspace_db::models::task::Task;
use collabspace_db::repositories::{CommentRepo, TaskRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{not_found, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::project::load_viewable;
use crate::middleware::auth::AuthUser;
use crate::notifications::{notify, notify_all};
use crate::query::CommentQuery;
use crate::response::{MessageResponse, ResourceResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub content: String,
    pub task_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub parent_comment_id: Option<DbId>,
    #[serde(default)]
    pub mentions: Vec<DbId>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub content: String,
    /// Replaces the stored mention list when present.
    pub mentions: Option<Vec<DbId>>,
}

/// The task (if any) and project a comment target resolves to.
struct ResolvedTarget {
    task: Option<Task>,
    project: Project,
}

/// GET /api/comments?task={id} or ?project={id}
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<CommentQuery>,
) -> AppResult<Json<ResourceResponse<Vec<Comment>>>> {
    let target = CommentTarget::from_parts(params.task, params.project)?;
    resolve_target(&state, target, auth.user_id).await?;

    let comments = match target {
        CommentTarget::Task(id) => CommentRepo::list_for_task(&state.pool, id).await?,
        CommentTarget::Project(id) => CommentRepo::list_for_project(&state.pool, id).await?,
    };
    Ok(Json(ResourceResponse::new("comments", comments)))
}

/// POST /api/comments
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<ResourceResponse<Comment>>)> {
    let target = CommentTarget::from_parts(input.task_id, input.project_id)?;
    let resolved = resolve_target(&state, target, auth.user_id).await?;
    if !resolved.project.settings.allow_comments {
        return Err(CoreError::Forbidden("Comments are disabled for this project".into()).into());
    }

    if let Some(parent_id) = input.parent_comment_id {
        let parent = CommentRepo::find_by_id(&state.pool, parent_id)
            .await?
            .ok_or_else(|| not_found("Comment", parent_id))?;
        let parent_target = parent.target().ok_or_else(|| not_found("Comment", parent_id))?;
        comment::validate_parent(parent_target, target)?;
    }

    let mentions = comment::normalize_mentions(input.mentions);
    if !UserRepo::all_exist(&state.pool, &mentions).await? {
        return Err(CoreError::Validation("Mentioned user does not exist".into()).into());
    }

    let created = CommentRepo::create(
        &state.pool,
        &CreateComment {
            content: input.content.trim().to_string(),
            author_id: auth.user_id,
            target,
            parent_comment_id: input.parent_comment_id,
            mentions,
        },
    )
    .await?;
    tracing::info!(comment_id = created.id, author_id = auth.user_id, "Comment posted");

    let author_name = author_name(&state, &auth).await?;

    if let Some(task) = &resolved.task {
        TaskRepo::refresh_comments_count(&state.pool, task.id).await?;
        if let Some(assignee) = task.assigned_to.filter(|id| *id != auth.user_id) {
            let draft = NotificationDraft::task_comment(
                assignee,
                auth.user_id,
                task.id,
                task.project_id,
                created.id,
                &author_name,
                &task.title,
            );
            notify(&state, draft).await?;
        }
    }

    notify_mentions(&state, &created, &created.mentions, &resolved, auth.user_id, &author_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ResourceResponse::new("comment", created).with_message("Comment added successfully")),
    ))
}

/// PUT /api/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCommentRequest>,
) -> AppResult<Json<ResourceResponse<Comment>>> {
    let existing = load_comment(&state, id).await?;
    let resolved = resolve_existing(&state, &existing, auth.user_id).await?;
    access::ensure_comment_author(existing.author_id, auth.user_id)?;

    let mentions = match input.mentions {
        Some(mentions) => comment::normalize_mentions(mentions),
        None => existing.mentions.clone(),
    };
    if !UserRepo::all_exist(&state.pool, &mentions).await? {
        return Err(CoreError::Validation("Mentioned user does not exist".into()).into());
    }

    let updated = CommentRepo::update_content(&state.pool, id, input.content.trim(), &mentions)
        .await?
        .ok_or_else(|| not_found("Comment", id))?;

    let added: Vec<DbId> = updated
        .mentions
        .iter()
        .copied()
        .filter(|m| !existing.mentions.contains(m))
        .collect();
    if !added.is_empty() {
        let author_name = author_name(&state, &auth).await?;
        notify_mentions(&state, &updated, &added, &resolved, auth.user_id, &author_name).await?;
    }

    Ok(Json(
        ResourceResponse::new("comment", updated).with_message("Comment updated successfully"),
    ))
}

/// DELETE /api/comments/{id}
///
/// Soft delete; the row stays for thread integrity.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let existing = load_comment(&state, id).await?;
    resolve_existing(&state, &existing, auth.user_id).await?;
    access::ensure_comment_author(existing.author_id, auth.user_id)?;

    if !CommentRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("Comment", id));
    }
    if let Some(task_id) = existing.task_id {
        TaskRepo::refresh_comments_count(&state.pool, task_id).await?;
    }
    tracing::info!(comment_id = id, "Comment deleted");
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_comment(state: &AppState, id: DbId) -> AppResult<Comment> {
    CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Comment", id))
}

/// Load the target and require read access to its project.
async fn resolve_target(
    state: &AppState,
    target: CommentTarget,
    user_id: DbId,
) -> AppResult<ResolvedTarget> {
    match target {
        CommentTarget::Task(task_id) => {
            let task = TaskRepo::find_by_id(&state.pool, task_id)
                .await?
                .ok_or_else(|| not_found("Task", task_id))?;
            let project = load_viewable(state, task.project_id, user_id).await?;
            Ok(ResolvedTarget {
                task: Some(task),
                project,
            })
        }
        CommentTarget::Project(project_id) => Ok(ResolvedTarget {
            task: None,
            project: load_viewable(state, project_id, user_id).await?,
        }),
    }
}

/// Resolve a stored comment's target and require read access to it.
async fn resolve_existing(
    state: &AppState,
    existing: &Comment,
    user_id: DbId,
) -> AppResult<ResolvedTarget> {
    let target = existing
        .target()
        .ok_or_else(|| not_found("Comment", existing.id))?;
    resolve_target(state, target, user_id).await
}

async fn author_name(state: &AppState, auth: &AuthUser) -> AppResult<String> {
    Ok(UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.full_name())
        .unwrap_or_else(|| auth.username.clone()))
}

/// Send a `mention` notification to each of `mentions` except the author.
async fn notify_mentions(
    state: &AppState,
    posted: &Comment,
    mentions: &[DbId],
    resolved: &ResolvedTarget,
    author_id: DbId,
    author_name: &str,
) -> AppResult<()> {
    let drafts = comment::mention_recipients(mentions, author_id).map(|recipient| {
        NotificationDraft::mention(
            recipient,
            author_id,
            posted.id,
            resolved.task.as_ref().map(|t| t.id),
            Some(resolved.project.id),
            author_name,
        )
    });
    notify_all(state, drafts.collect::<Vec<_>>()).await
}

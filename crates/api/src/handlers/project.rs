//! Handlers for the `/projects` resource and its membership list.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use collabspace_core::access;
use collabspace_core::error::CoreError;
use collabspace_core::notification::NotificationDraft;
use collabspace_core::priority::Priority;
use collabspace_core::project::{ProjectCategory, ProjectSettings, ProjectStatus};
use collabspace_core::roles::ProjectRole;
use collabspace_core::types::{DbId, Timestamp};
use collabspace_db::models::project::{
    CreateProject, Project, ProjectDetail, ProjectFilter, ProjectMember, UpdateProject,
};
use collabspace_db::repositories::{ProjectRepo, TaskRepo, TeamRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{not_found, AppResult};
use crate::extract::{double_option, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::notifications::notify;
use crate::query::ProjectQuery;
use crate::response::{MessageResponse, ResourceResponse};
use crate::services::stats;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 100, message = "Project name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub category: Option<ProjectCategory>,
    pub team_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub tags: Option<Vec<String>>,
    pub settings: Option<ProjectSettings>,
}

/// Allow-listed project fields. Absent or `null` leaves a field unchanged,
/// except `team_id` where `null` detaches the project from its team.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 100, message = "Project name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub category: Option<ProjectCategory>,
    #[serde(default, deserialize_with = "double_option")]
    pub team_id: Option<Option<DbId>>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub tags: Option<Vec<String>>,
    pub settings: Option<ProjectSettings>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    pub user_id: DbId,
    pub role: Option<ProjectRole>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ProjectQuery>,
) -> AppResult<Json<ResourceResponse<Vec<ProjectDetail>>>> {
    let filter = ProjectFilter {
        status: params.status,
        priority: params.priority,
        category: params.category,
    };
    let projects = ProjectRepo::list_visible(&state.pool, auth.user_id, &filter).await?;

    let mut details = Vec::with_capacity(projects.len());
    for project in projects {
        let members = ProjectRepo::list_members(&state.pool, project.id).await?;
        details.push(detail(project, members));
    }
    Ok(Json(ResourceResponse::new("projects", details)))
}

/// POST /api/projects
///
/// The caller becomes the owner and first member.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<ResourceResponse<ProjectDetail>>)> {
    if let Some(team_id) = input.team_id {
        ensure_team_access(&state, team_id, auth.user_id).await?;
    }

    let created = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            name: input.name.trim().to_string(),
            description: input.description,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            owner_id: auth.user_id,
            team_id: input.team_id,
            start_date: input.start_date,
            end_date: input.end_date,
            deadline: input.deadline,
            tags: input.tags.unwrap_or_default(),
            settings: input.settings.unwrap_or_default(),
        },
    )
    .await?;
    ProjectRepo::add_member(&state.pool, created.id, auth.user_id, ProjectRole::Owner).await?;
    stats::recompute_project_stats(&state.pool, created.id).await?;

    tracing::info!(project_id = created.id, owner_id = auth.user_id, "Project created");

    let (project, members) = load_with_members(&state, created.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ResourceResponse::new("project", detail(project, members))
                .with_message("Project created successfully"),
        ),
    ))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ResourceResponse<ProjectDetail>>> {
    let (project, members) = load_with_members(&state, id).await?;
    access::ensure_project_viewer(project.owner_id, &members, auth.user_id)?;
    Ok(Json(ResourceResponse::new("project", detail(project, members))))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateProjectRequest>,
) -> AppResult<Json<ResourceResponse<ProjectDetail>>> {
    let (project, members) = load_with_members(&state, id).await?;
    access::ensure_project_manager(project.owner_id, &members, auth.user_id)?;

    let previous_team = project.team_id;
    let team_change = input.team_id.filter(|next| *next != previous_team);
    if let Some(Some(team_id)) = team_change {
        ensure_team_access(&state, team_id, auth.user_id).await?;
    }

    let changes = UpdateProject {
        name: input.name.map(|n| n.trim().to_string()),
        description: input.description,
        status: input.status,
        priority: input.priority,
        category: input.category,
        start_date: input.start_date,
        end_date: input.end_date,
        deadline: input.deadline,
        tags: input.tags,
        settings: input.settings,
    };
    ProjectRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| not_found("Project", id))?;

    if let Some(next_team) = team_change {
        ProjectRepo::set_team(&state.pool, id, next_team).await?;
        tracing::info!(project_id = id, ?previous_team, ?next_team, "Project team changed");
        if let Some(old_team) = previous_team {
            stats::recompute_team_stats(&state.pool, old_team).await?;
        }
    }
    // Also recomputes the (new) team, which picks up a status change.
    stats::recompute_project_stats(&state.pool, id).await?;

    let (project, members) = load_with_members(&state, id).await?;
    Ok(Json(
        ResourceResponse::new("project", detail(project, members))
            .with_message("Project updated successfully"),
    ))
}

/// DELETE /api/projects/{id}
///
/// Owner only. Tasks are removed first; the task foreign key does not cascade.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Project", id))?;
    access::ensure_project_owner(project.owner_id, auth.user_id)?;

    let removed_tasks = TaskRepo::delete_by_project(&state.pool, id).await?;
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(not_found("Project", id));
    }
    tracing::info!(project_id = id, removed_tasks, "Project deleted");

    if let Some(team_id) = project.team_id {
        stats::recompute_team_stats(&state.pool, team_id).await?;
    }
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}

/// POST /api/projects/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<AddMemberRequest>,
) -> AppResult<(StatusCode, Json<ResourceResponse<ProjectDetail>>)> {
    let (project, members) = load_with_members(&state, id).await?;
    access::ensure_project_manager(project.owner_id, &members, auth.user_id)?;

    let role = input.role.unwrap_or(ProjectRole::Member);
    if role == ProjectRole::Owner {
        return Err(CoreError::Validation("A project has exactly one owner".into()).into());
    }
    if UserRepo::find_by_id(&state.pool, input.user_id).await?.is_none() {
        return Err(not_found("User", input.user_id));
    }
    if !ProjectRepo::add_member(&state.pool, id, input.user_id, role).await? {
        return Err(CoreError::Conflict("User is already a project member".into()).into());
    }

    notify(
        &state,
        NotificationDraft::project_added(input.user_id, auth.user_id, id, &project.name),
    )
    .await?;
    stats::recompute_project_stats(&state.pool, id).await?;

    let (project, members) = load_with_members(&state, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ResourceResponse::new("project", detail(project, members))
                .with_message("Member added successfully"),
        ),
    ))
}

/// DELETE /api/projects/{id}/members/{user_id}
///
/// Managers may remove anyone but the owner; members may remove themselves.
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ResourceResponse<ProjectDetail>>> {
    let (project, members) = load_with_members(&state, id).await?;
    if user_id != auth.user_id {
        access::ensure_project_manager(project.owner_id, &members, auth.user_id)?;
    }
    if user_id == project.owner_id {
        return Err(CoreError::Validation("The project owner cannot be removed".into()).into());
    }
    if !ProjectRepo::remove_member(&state.pool, id, user_id).await? {
        return Err(not_found("Project member", user_id));
    }
    stats::recompute_project_stats(&state.pool, id).await?;

    let (project, members) = load_with_members(&state, id).await?;
    Ok(Json(
        ResourceResponse::new("project", detail(project, members))
            .with_message("Member removed successfully"),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a project and its current membership list, or 404.
pub(crate) async fn load_with_members(
    state: &AppState,
    id: DbId,
) -> AppResult<(Project, Vec<ProjectMember>)> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Project", id))?;
    let members = ProjectRepo::list_members(&state.pool, id).await?;
    Ok((project, members))
}

/// Load a project and require that `user_id` may see it.
pub(crate) async fn load_viewable(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> AppResult<Project> {
    let (project, members) = load_with_members(state, id).await?;
    access::ensure_project_viewer(project.owner_id, &members, user_id)?;
    Ok(project)
}

/// Load a project and require that `user_id` may change its tasks.
pub(crate) async fn load_contributable(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> AppResult<Project> {
    let (project, members) = load_with_members(state, id).await?;
    access::ensure_project_viewer(project.owner_id, &members, user_id)?;
    access::ensure_project_contributor(project.owner_id, &members, user_id)?;
    Ok(project)
}

fn detail(project: Project, members: Vec<ProjectMember>) -> ProjectDetail {
    ProjectDetail {
        is_overdue: project.is_overdue(Utc::now()),
        project,
        members,
    }
}

/// A project may only be attached to a team the caller belongs to.
async fn ensure_team_access(state: &AppState, team_id: DbId, user_id: DbId) -> AppResult<()> {
    let team = TeamRepo::find_by_id(&state.pool, team_id)
        .await?
        .ok_or_else(|| not_found("Team", team_id))?;
    let members = TeamRepo::list_members(&state.pool, team_id).await?;
    access::ensure_team_member(team.lead_id, &members, user_id)?;
    Ok(())
}

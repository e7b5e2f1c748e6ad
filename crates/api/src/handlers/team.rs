//! Handlers for the `/teams` resource and its membership list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use collabspace_core::access;
use collabspace_core::error::CoreError;
use collabspace_core::notification::NotificationDraft;
use collabspace_core::roles::TeamRole;
use collabspace_core::team::{TeamCategory, TeamSettings, DEFAULT_AVATAR_URL};
use collabspace_core::types::DbId;
use collabspace_db::models::team::{CreateTeam, Team, TeamDetail, TeamMember, UpdateTeam};
use collabspace_db::repositories::{ProjectRepo, TeamRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{not_found, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::notifications::notify;
use crate::response::ResourceResponse;
use crate::services::stats;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100, message = "Team name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    pub category: Option<TeamCategory>,
    #[validate(length(min = 1, max = 500))]
    pub avatar: Option<String>,
    pub settings: Option<TeamSettings>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 100, message = "Team name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    pub category: Option<TeamCategory>,
    #[validate(length(min = 1, max = 500))]
    pub avatar: Option<String>,
    pub settings: Option<TeamSettings>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddTeamMemberRequest {
    pub user_id: DbId,
    pub role: Option<TeamRole>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/teams
///
/// Teams the caller leads or belongs to.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ResourceResponse<Vec<TeamDetail>>>> {
    let teams = TeamRepo::list_for_user(&state.pool, auth.user_id).await?;
    let mut details = Vec::with_capacity(teams.len());
    for team in teams {
        let members = TeamRepo::list_members(&state.pool, team.id).await?;
        details.push(detail(&state, team, members).await?);
    }
    Ok(Json(ResourceResponse::new("teams", details)))
}

/// POST /api/teams
///
/// The caller becomes the lead and first member.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateTeamRequest>,
) -> AppResult<(StatusCode, Json<ResourceResponse<TeamDetail>>)> {
    let created = TeamRepo::create(
        &state.pool,
        &CreateTeam {
            name: input.name.trim().to_string(),
            description: input.description,
            lead_id: auth.user_id,
            category: input.category.unwrap_or_default(),
            avatar: input.avatar.unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            settings: input.settings.unwrap_or_default(),
        },
    )
    .await?;
    TeamRepo::add_member(&state.pool, created.id, auth.user_id, TeamRole::Lead).await?;
    stats::recompute_team_stats(&state.pool, created.id).await?;

    tracing::info!(team_id = created.id, lead_id = auth.user_id, "Team created");

    let (team, members) = load_with_members(&state, created.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ResourceResponse::new("team", detail(&state, team, members).await?)
                .with_message("Team created successfully"),
        ),
    ))
}

/// GET /api/teams/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ResourceResponse<TeamDetail>>> {
    let (team, members) = load_with_members(&state, id).await?;
    access::ensure_team_member(team.lead_id, &members, auth.user_id)?;
    Ok(Json(ResourceResponse::new("team", detail(&state, team, members).await?)))
}

/// PUT /api/teams/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTeamRequest>,
) -> AppResult<Json<ResourceResponse<TeamDetail>>> {
    let (team, members) = load_with_members(&state, id).await?;
    access::ensure_team_manager(team.lead_id, &members, auth.user_id)?;

    let changes = UpdateTeam {
        name: input.name.map(|n| n.trim().to_string()),
        description: input.description,
        category: input.category,
        avatar: input.avatar,
        settings: input.settings,
        is_active: input.is_active,
    };
    let updated = TeamRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| not_found("Team", id))?;

    Ok(Json(
        ResourceResponse::new("team", detail(&state, updated, members).await?)
            .with_message("Team updated successfully"),
    ))
}

/// POST /api/teams/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<AddTeamMemberRequest>,
) -> AppResult<(StatusCode, Json<ResourceResponse<TeamDetail>>)> {
    let (team, members) = load_with_members(&state, id).await?;
    access::ensure_team_manager(team.lead_id, &members, auth.user_id)?;

    let role = input.role.unwrap_or(TeamRole::Member);
    if role == TeamRole::Lead {
        return Err(CoreError::Validation("A team has exactly one lead".into()).into());
    }
    if UserRepo::find_by_id(&state.pool, input.user_id).await?.is_none() {
        return Err(not_found("User", input.user_id));
    }
    if !TeamRepo::add_member(&state.pool, id, input.user_id, role).await? {
        return Err(CoreError::Conflict("User is already a team member".into()).into());
    }

    notify(
        &state,
        NotificationDraft::team_invite(input.user_id, auth.user_id, id, &team.name),
    )
    .await?;
    stats::recompute_team_stats(&state.pool, id).await?;

    let (team, members) = load_with_members(&state, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ResourceResponse::new("team", detail(&state, team, members).await?)
                .with_message("Member added successfully"),
        ),
    ))
}

/// DELETE /api/teams/{id}/members/{user_id}
///
/// Managers may remove anyone but the lead; members may leave on their own.
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ResourceResponse<TeamDetail>>> {
    let (team, members) = load_with_members(&state, id).await?;
    if user_id != auth.user_id {
        access::ensure_team_manager(team.lead_id, &members, auth.user_id)?;
    }
    if user_id == team.lead_id {
        return Err(CoreError::Validation("The team lead cannot be removed".into()).into());
    }
    if !TeamRepo::remove_member(&state.pool, id, user_id).await? {
        return Err(not_found("Team member", user_id));
    }
    stats::recompute_team_stats(&state.pool, id).await?;

    let (team, members) = load_with_members(&state, id).await?;
    Ok(Json(
        ResourceResponse::new("team", detail(&state, team, members).await?)
            .with_message("Member removed successfully"),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_with_members(state: &AppState, id: DbId) -> AppResult<(Team, Vec<TeamMember>)> {
    let team = TeamRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Team", id))?;
    let members = TeamRepo::list_members(&state.pool, id).await?;
    Ok((team, members))
}

async fn detail(state: &AppState, team: Team, members: Vec<TeamMember>) -> AppResult<TeamDetail> {
    let projects = ProjectRepo::ids_for_team(&state.pool, team.id).await?;
    Ok(TeamDetail::new(team, members, projects))
}

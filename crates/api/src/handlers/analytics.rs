//! Handlers for `/analytics`.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use collabspace_core::dashboard::DashboardStats;
use collabspace_db::models::project::ProjectFilter;
use collabspace_db::models::task::Task;
use collabspace_db::repositories::{ProjectRepo, TaskRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::ResourceResponse;
use crate::state::AppState;

/// GET /api/analytics/dashboard
///
/// Figures over every project the caller owns or belongs to.
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ResourceResponse<DashboardStats<Task>>>> {
    let projects =
        ProjectRepo::list_visible(&state.pool, auth.user_id, &ProjectFilter::default()).await?;
    let statuses: Vec<_> = projects.iter().map(|p| p.status).collect();
    let project_ids: Vec<_> = projects.iter().map(|p| p.id).collect();

    let tasks = TaskRepo::list_by_projects(&state.pool, &project_ids).await?;
    let stats = DashboardStats::compute(auth.user_id, &statuses, tasks, Utc::now());
    Ok(Json(ResourceResponse::new("stats", stats)))
}

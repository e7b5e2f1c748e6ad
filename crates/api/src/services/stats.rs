//! Denormalized statistics recompute.
//!
//! Counters are rebuilt from the child rows after every write that can
//! change them. Each recompute is "correct once the triggering write has
//! landed"; concurrent writers may briefly observe stale values.

use collabspace_core::stats::{ProjectRollup, TeamRollup};
use collabspace_core::types::DbId;
use collabspace_db::repositories::{ProjectRepo, TaskRepo, TeamRepo};
use collabspace_db::DbPool;

use crate::error::AppResult;

/// Rebuild a project's task/member counters and progress, then its team's.
///
/// Returns `None` when the project no longer exists.
pub async fn recompute_project_stats(
    pool: &DbPool,
    project_id: DbId,
) -> AppResult<Option<ProjectRollup>> {
    let Some(project) = ProjectRepo::find_by_id(pool, project_id).await? else {
        return Ok(None);
    };

    let statuses = TaskRepo::statuses_for_projects(pool, &[project_id]).await?;
    let total_members = ProjectRepo::count_members(pool, project_id).await?;
    let rollup = ProjectRollup::compute(statuses, total_members);
    ProjectRepo::update_stats(pool, project_id, &rollup).await?;

    tracing::debug!(
        project_id,
        total_tasks = rollup.total_tasks,
        completed_tasks = rollup.completed_tasks,
        progress = rollup.progress,
        "Project stats recomputed",
    );

    if let Some(team_id) = project.team_id {
        recompute_team_stats(pool, team_id).await?;
    }
    Ok(Some(rollup))
}

/// Rebuild a team's project/task counters and member point total.
pub async fn recompute_team_stats(pool: &DbPool, team_id: DbId) -> AppResult<TeamRollup> {
    let project_statuses = ProjectRepo::statuses_for_team(pool, team_id).await?;
    let project_ids = ProjectRepo::ids_for_team(pool, team_id).await?;
    let task_statuses = TaskRepo::statuses_for_projects(pool, &project_ids).await?;
    let member_points = TeamRepo::member_points(pool, team_id).await?;

    let rollup = TeamRollup::compute(project_statuses, task_statuses, member_points);
    TeamRepo::update_stats(pool, team_id, &rollup).await?;

    tracing::debug!(
        team_id,
        total_projects = rollup.total_projects,
        total_tasks = rollup.total_tasks,
        total_points = rollup.total_points,
        "Team stats recomputed",
    );
    Ok(rollup)
}

/// Recompute every team the user is a member of.
pub async fn recompute_teams_for_user(pool: &DbPool, user_id: DbId) -> AppResult<()> {
    for team_id in TeamRepo::ids_for_member(pool, user_id).await? {
        recompute_team_stats(pool, team_id).await?;
    }
    Ok(())
}

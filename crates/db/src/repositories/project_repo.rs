//! Repository for the `projects` and `project_members` tables.

use collabspace_core::project::ProjectStatus;
use collabspace_core::roles::ProjectRole;
use collabspace_core::stats::ProjectRollup;
use collabspace_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::decode_error;
use crate::models::project::{
    CreateProject, Project, ProjectFilter, ProjectMember, UpdateProject,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, priority, category, owner_id, team_id, \
    start_date, end_date, deadline, tags, settings, total_tasks, completed_tasks, total_members, \
    progress, created_at, updated_at";

const MEMBER_COLUMNS: &str = "project_id, user_id, role, joined_at";

/// Visibility predicate: owner or member. Expects the user id in `$1`.
const VISIBLE_TO_USER: &str = "(owner_id = $1 OR EXISTS (
        SELECT 1 FROM project_members pm WHERE pm.project_id = projects.id AND pm.user_id = $1))";

/// Provides CRUD and membership operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, status, priority, category, owner_id,
                team_id, start_date, end_date, deadline, tags, settings)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.category.as_str())
            .bind(input.owner_id)
            .bind(input.team_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.deadline)
            .bind(&input.tags)
            .bind(Json(input.settings))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects the user owns or belongs to, newest first.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: DbId,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE {VISIBLE_TO_USER}
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TEXT IS NULL OR priority = $3)
               AND ($4::TEXT IS NULL OR category = $4)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(filter.category.map(|c| c.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Ids of every project the user owns or belongs to.
    pub async fn visible_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!("SELECT id FROM projects WHERE {VISIBLE_TO_USER}");
        sqlx::query_scalar(&query).bind(user_id).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                category = COALESCE($6, category),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                deadline = COALESCE($9, deadline),
                tags = COALESCE($10, tags),
                settings = COALESCE($11, settings)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.deadline)
            .bind(&input.tags)
            .bind(input.settings.map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Attach the project to a team, or detach it with `None`.
    pub async fn set_team(
        pool: &PgPool,
        id: DbId,
        team_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET team_id = $2 WHERE id = $1")
            .bind(id)
            .bind(team_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a project. Its tasks must already be gone.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist recomputed counters and progress.
    pub async fn update_stats(
        pool: &PgPool,
        id: DbId,
        rollup: &ProjectRollup,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects
             SET total_tasks = $2, completed_tasks = $3, total_members = $4, progress = $5
             WHERE id = $1",
        )
        .bind(id)
        .bind(rollup.total_tasks)
        .bind(rollup.completed_tasks)
        .bind(rollup.total_members)
        .bind(rollup.progress)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ids of all projects linked to a team.
    pub async fn ids_for_team(pool: &PgPool, team_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM projects WHERE team_id = $1 ORDER BY id")
            .bind(team_id)
            .fetch_all(pool)
            .await
    }

    /// Statuses of all projects linked to a team.
    pub async fn statuses_for_team(
        pool: &PgPool,
        team_id: DbId,
    ) -> Result<Vec<ProjectStatus>, sqlx::Error> {
        let raw: Vec<String> = sqlx::query_scalar("SELECT status FROM projects WHERE team_id = $1")
            .bind(team_id)
            .fetch_all(pool)
            .await?;
        raw.into_iter()
            .map(|s| ProjectStatus::try_from(s).map_err(decode_error))
            .collect()
    }

    // -- Members --------------------------------------------------------------

    /// Add a member. Returns `false` if the user was already a member.
    pub async fn add_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        role: ProjectRole,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO project_members (project_id, user_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (project_id, user_id) DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Members of a project in join order.
    pub async fn list_members(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM project_members
             WHERE project_id = $1
             ORDER BY joined_at, user_id"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_members(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await
    }
}

//! Repository for the `teams` and `team_members` tables.

use collabspace_core::roles::TeamRole;
use collabspace_core::stats::TeamRollup;
use collabspace_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::team::{CreateTeam, Team, TeamMember, UpdateTeam};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, lead_id, category, avatar, settings, is_active, \
    total_projects, completed_projects, total_tasks, completed_tasks, total_points, \
    created_at, updated_at";

const MEMBER_COLUMNS: &str = "team_id, user_id, role, joined_at";

/// Provides CRUD and membership operations for teams.
pub struct TeamRepo;

impl TeamRepo {
    pub async fn create(pool: &PgPool, input: &CreateTeam) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO teams (name, description, lead_id, category, avatar, settings)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.lead_id)
            .bind(input.category.as_str())
            .bind(&input.avatar)
            .bind(Json(input.settings))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Teams the user leads or belongs to, ordered by name.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM teams
             WHERE lead_id = $1 OR EXISTS (
                SELECT 1 FROM team_members tm WHERE tm.team_id = teams.id AND tm.user_id = $1)
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of every team the user is a member of.
    pub async fn ids_for_member(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT team_id FROM team_members WHERE user_id = $1 ORDER BY team_id")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a team. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTeam,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!(
            "UPDATE teams SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                avatar = COALESCE($5, avatar),
                settings = COALESCE($6, settings),
                is_active = COALESCE($7, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.category.map(|c| c.as_str()))
            .bind(&input.avatar)
            .bind(input.settings.map(Json))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Persist recomputed counters.
    pub async fn update_stats(
        pool: &PgPool,
        id: DbId,
        rollup: &TeamRollup,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE teams
             SET total_projects = $2, completed_projects = $3, total_tasks = $4,
                 completed_tasks = $5, total_points = $6
             WHERE id = $1",
        )
        .bind(id)
        .bind(rollup.total_projects)
        .bind(rollup.completed_projects)
        .bind(rollup.total_tasks)
        .bind(rollup.completed_tasks)
        .bind(rollup.total_points)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Members --------------------------------------------------------------

    /// Add a member. Returns `false` if the user was already a member.
    pub async fn add_member(
        pool: &PgPool,
        team_id: DbId,
        user_id: DbId,
        role: TeamRole,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO team_members (team_id, user_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (team_id, user_id) DO NOTHING",
        )
        .bind(team_id)
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_member(
        pool: &PgPool,
        team_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_members(
        pool: &PgPool,
        team_id: DbId,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members
             WHERE team_id = $1
             ORDER BY joined_at, user_id"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(team_id)
            .fetch_all(pool)
            .await
    }

    /// Current point totals of every team member, read fresh from `users`.
    pub async fn member_points(pool: &PgPool, team_id: DbId) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT u.points FROM team_members tm
             JOIN users u ON u.id = tm.user_id
             WHERE tm.team_id = $1",
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
    }
}

//! Repository for the `users` table.

use collabspace_core::gamification::POINTS_PER_LEVEL;
use collabspace_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateProfile, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, avatar, role, \
    bio, skills, points, level, preferences, last_active_at, is_active, created_at, updated_at";

/// Provides account and gamification persistence for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Duplicate usernames or emails fail with the `uq_users_*` constraints.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, avatar)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.avatar)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. The lookup is case-insensitive.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await
    }

    /// Whether every id in `ids` refers to an existing user.
    pub async fn all_exist(pool: &PgPool, ids: &[DbId]) -> Result<bool, sqlx::Error> {
        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(pool)
            .await?;
        Ok(found as usize == ids.len())
    }

    /// Apply a profile update. Only non-`None` fields are written.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                avatar = COALESCE($4, avatar),
                bio = COALESCE($5, bio),
                skills = COALESCE($6, skills),
                preferences = COALESCE($7, preferences)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.avatar)
            .bind(&input.bio)
            .bind(&input.skills)
            .bind(input.preferences.map(Json))
            .fetch_optional(pool)
            .await
    }

    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that the user was just active (login).
    pub async fn touch_last_active(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_active_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Add `delta` points and recompute the level in one statement.
    ///
    /// Returns the new point total, or `None` if the user does not exist.
    /// Concurrent awards to the same user all land.
    pub async fn add_points(
        pool: &PgPool,
        id: DbId,
        delta: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE users SET points = points + $2, level = ((points + $2) / $3 + 1)::INTEGER \
             WHERE id = $1 \
             RETURNING points",
        )
        .bind(id)
        .bind(delta)
        .bind(POINTS_PER_LEVEL)
        .fetch_optional(pool)
        .await
    }
}

//! Repository for the `comments` table.

use collabspace_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, content, author_id, task_id, project_id, parent_comment_id, mentions, \
    is_edited, edited_at, is_deleted, deleted_at, created_at, updated_at";

/// Provides CRUD operations for comments. Deletion is soft.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (content, author_id, task_id, project_id, parent_comment_id,
                mentions)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&input.content)
            .bind(input.author_id)
            .bind(input.target.task_id())
            .bind(input.target.project_id())
            .bind(input.parent_comment_id)
            .bind(&input.mentions)
            .fetch_one(pool)
            .await
    }

    /// Find a comment that has not been deleted.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1 AND is_deleted = false");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Non-deleted comments on a task, oldest first.
    pub async fn list_for_task(pool: &PgPool, task_id: DbId) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE task_id = $1 AND is_deleted = false
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// Non-deleted comments on a project, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE project_id = $1 AND is_deleted = false
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the content and mark the comment edited.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
        mentions: &[DbId],
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments
             SET content = $2, mentions = $3, is_edited = true, edited_at = NOW()
             WHERE id = $1 AND is_deleted = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(content)
            .bind(mentions)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a comment. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET is_deleted = true, deleted_at = NOW()
             WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Comment entity model and DTOs.

use collabspace_core::comment::CommentTarget;
use collabspace_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub content: String,
    pub author_id: DbId,
    pub task_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub parent_comment_id: Option<DbId>,
    pub mentions: Vec<DbId>,
    pub is_edited: bool,
    pub edited_at: Option<Timestamp>,
    pub is_deleted: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Comment {
    /// The task or project this comment is attached to.
    pub fn target(&self) -> Option<CommentTarget> {
        CommentTarget::from_parts(self.task_id, self.project_id).ok()
    }
}

#[derive(Debug, Clone)]
pub struct CreateComment {
    pub content: String,
    pub author_id: DbId,
    pub target: CommentTarget,
    pub parent_comment_id: Option<DbId>,
    pub mentions: Vec<DbId>,
}

//! Notification entity model.

use collabspace_core::notification::{NotificationPriority, NotificationType};
use collabspace_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub recipient_id: DbId,
    pub sender_id: Option<DbId>,
    #[sqlx(rename = "type", try_from = "String")]
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub task_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub team_id: Option<DbId>,
    pub comment_id: Option<DbId>,
    pub action_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub priority: NotificationPriority,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

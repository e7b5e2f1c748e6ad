//! Notification kinds, priorities, retention, and message drafts.
//!
//! A [`NotificationDraft`] is everything needed to insert a notification
//! row. The constructors fix the title, message wording, references, and
//! action link for each kind so every call site produces the same text.

use chrono::Duration;
use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// Days a notification is kept before it expires.
pub const RETENTION_DAYS: i64 = 30;

define_str_enum! {
    /// What happened.
    NotificationType {
        TaskAssigned => "task_assigned",
        TaskCompleted => "task_completed",
        TaskComment => "task_comment",
        ProjectAdded => "project_added",
        TeamInvite => "team_invite",
        Mention => "mention",
        DeadlineReminder => "deadline_reminder",
        MilestoneCompleted => "milestone_completed",
        BadgeEarned => "badge_earned",
        LevelUp => "level_up",
    }
}

define_str_enum! {
    /// Display urgency of a notification.
    NotificationPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Default for NotificationPriority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Expiry timestamp for a notification created at `created_at`.
pub fn expires_at(created_at: Timestamp) -> Timestamp {
    created_at + Duration::days(RETENTION_DAYS)
}

/// An unsaved notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDraft {
    pub recipient_id: DbId,
    pub sender_id: Option<DbId>,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub task_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub team_id: Option<DbId>,
    pub comment_id: Option<DbId>,
    pub action_url: Option<String>,
    pub priority: NotificationPriority,
}

impl NotificationDraft {
    fn new(
        recipient_id: DbId,
        sender_id: Option<DbId>,
        kind: NotificationType,
        title: impl Into<String>,
        message: String,
    ) -> Self {
        Self {
            recipient_id,
            sender_id,
            kind,
            title: title.into(),
            message,
            task_id: None,
            project_id: None,
            team_id: None,
            comment_id: None,
            action_url: None,
            priority: NotificationPriority::default(),
        }
    }

    fn with_task(mut self, task_id: DbId, project_id: DbId) -> Self {
        self.task_id = Some(task_id);
        self.project_id = Some(project_id);
        self.action_url = Some(format!("/tasks/{task_id}"));
        self
    }

    pub fn task_assigned(
        recipient_id: DbId,
        sender_id: DbId,
        task_id: DbId,
        project_id: DbId,
        task_title: &str,
    ) -> Self {
        Self::new(
            recipient_id,
            Some(sender_id),
            NotificationType::TaskAssigned,
            "New Task Assigned",
            format!("You have been assigned to task: {task_title}"),
        )
        .with_task(task_id, project_id)
    }

    pub fn task_completed(
        recipient_id: DbId,
        sender_id: DbId,
        task_id: DbId,
        project_id: DbId,
        task_title: &str,
    ) -> Self {
        Self::new(
            recipient_id,
            Some(sender_id),
            NotificationType::TaskCompleted,
            "Task Completed",
            format!("Task \"{task_title}\" has been completed"),
        )
        .with_task(task_id, project_id)
    }

    pub fn task_comment(
        recipient_id: DbId,
        sender_id: DbId,
        task_id: DbId,
        project_id: DbId,
        comment_id: DbId,
        author_name: &str,
        task_title: &str,
    ) -> Self {
        let mut draft = Self::new(
            recipient_id,
            Some(sender_id),
            NotificationType::TaskComment,
            "New Comment",
            format!("{author_name} commented on task: {task_title}"),
        )
        .with_task(task_id, project_id);
        draft.comment_id = Some(comment_id);
        draft.priority = NotificationPriority::Low;
        draft
    }

    /// Mention in a comment on either a task or a project.
    pub fn mention(
        recipient_id: DbId,
        sender_id: DbId,
        comment_id: DbId,
        task_id: Option<DbId>,
        project_id: Option<DbId>,
        author_name: &str,
    ) -> Self {
        let mut draft = Self::new(
            recipient_id,
            Some(sender_id),
            NotificationType::Mention,
            "You were mentioned",
            format!("{author_name} mentioned you in a comment"),
        );
        draft.comment_id = Some(comment_id);
        draft.task_id = task_id;
        draft.project_id = project_id;
        draft.action_url = match (task_id, project_id) {
            (Some(task), _) => Some(format!("/tasks/{task}")),
            (None, Some(project)) => Some(format!("/projects/{project}")),
            (None, None) => None,
        };
        draft
    }

    pub fn project_added(
        recipient_id: DbId,
        sender_id: DbId,
        project_id: DbId,
        project_name: &str,
    ) -> Self {
        let mut draft = Self::new(
            recipient_id,
            Some(sender_id),
            NotificationType::ProjectAdded,
            "Added to Project",
            format!("You have been added to project: {project_name}"),
        );
        draft.project_id = Some(project_id);
        draft.action_url = Some(format!("/projects/{project_id}"));
        draft
    }

    pub fn team_invite(
        recipient_id: DbId,
        sender_id: DbId,
        team_id: DbId,
        team_name: &str,
    ) -> Self {
        let mut draft = Self::new(
            recipient_id,
            Some(sender_id),
            NotificationType::TeamInvite,
            "Added to Team",
            format!("You have been added to team: {team_name}"),
        );
        draft.team_id = Some(team_id);
        draft.action_url = Some(format!("/teams/{team_id}"));
        draft
    }

    /// System notification; has no sender.
    pub fn level_up(recipient_id: DbId, level: i32) -> Self {
        let mut draft = Self::new(
            recipient_id,
            None,
            NotificationType::LevelUp,
            "Level Up!",
            format!("Congratulations! You reached level {level}"),
        );
        draft.action_url = Some("/profile".to_string());
        draft.priority = NotificationPriority::High;
        draft
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn notifications_expire_after_thirty_days() {
        let now = Utc::now();
        assert_eq!(expires_at(now) - now, Duration::days(30));
    }

    #[test]
    fn types_use_snake_case_wire_values() {
        assert_eq!(NotificationType::TaskAssigned.as_str(), "task_assigned");
        assert_eq!(NotificationType::ALL.len(), 10);
        assert_eq!(
            NotificationType::from_str_value("level_up").unwrap(),
            NotificationType::LevelUp
        );
    }

    #[test]
    fn task_assigned_links_to_task() {
        let draft = NotificationDraft::task_assigned(2, 1, 40, 7, "Write docs");
        assert_eq!(draft.kind, NotificationType::TaskAssigned);
        assert_eq!(draft.message, "You have been assigned to task: Write docs");
        assert_eq!(draft.task_id, Some(40));
        assert_eq!(draft.project_id, Some(7));
        assert_eq!(draft.action_url.as_deref(), Some("/tasks/40"));
        assert_eq!(draft.priority, NotificationPriority::Medium);
    }

    #[test]
    fn project_mention_links_to_project() {
        let draft = NotificationDraft::mention(3, 1, 9, None, Some(7), "ada");
        assert_eq!(draft.comment_id, Some(9));
        assert_eq!(draft.action_url.as_deref(), Some("/projects/7"));
        assert_eq!(draft.message, "ada mentioned you in a comment");
    }

    #[test]
    fn level_up_has_no_sender() {
        let draft = NotificationDraft::level_up(3, 4);
        assert_eq!(draft.sender_id, None);
        assert_eq!(draft.priority, NotificationPriority::High);
        assert!(draft.message.contains("level 4"));
    }
}

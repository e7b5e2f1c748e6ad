//! Comment targets, threading rules, and mention normalization.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{dedupe_ids, DbId};

/// What a comment is attached to. Exactly one of task or project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CommentTarget {
    Task(DbId),
    Project(DbId),
}

impl CommentTarget {
    /// Build a target from the two optional reference columns.
    pub fn from_parts(task_id: Option<DbId>, project_id: Option<DbId>) -> Result<Self, CoreError> {
        match (task_id, project_id) {
            (Some(task), None) => Ok(Self::Task(task)),
            (None, Some(project)) => Ok(Self::Project(project)),
            (None, None) => Err(CoreError::Validation(
                "A comment must target a task or a project".into(),
            )),
            (Some(_), Some(_)) => Err(CoreError::Validation(
                "A comment cannot target both a task and a project".into(),
            )),
        }
    }

    pub fn task_id(self) -> Option<DbId> {
        match self {
            Self::Task(id) => Some(id),
            Self::Project(_) => None,
        }
    }

    pub fn project_id(self) -> Option<DbId> {
        match self {
            Self::Project(id) => Some(id),
            Self::Task(_) => None,
        }
    }
}

/// A reply must live on the same task or project as its parent.
pub fn validate_parent(parent: CommentTarget, reply: CommentTarget) -> Result<(), CoreError> {
    if parent == reply {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Parent comment belongs to a different target".into(),
        ))
    }
}

/// Deduplicate mentioned user ids, keeping first-seen order.
pub fn normalize_mentions(mentions: Vec<DbId>) -> Vec<DbId> {
    dedupe_ids(mentions)
}

/// Users who should receive a `mention` notification: everyone mentioned
/// except the author.
pub fn mention_recipients(mentions: &[DbId], author_id: DbId) -> impl Iterator<Item = DbId> + '_ {
    mentions.iter().copied().filter(move |id| *id != author_id)
}

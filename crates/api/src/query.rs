//! Query-string parameter types for list endpoints.

use collabspace_core::priority::Priority;
use collabspace_core::project::{ProjectCategory, ProjectStatus};
use collabspace_core::task::TaskStatus;
use collabspace_core::types::DbId;
use serde::Deserialize;

/// Default page size for notification listings.
pub const DEFAULT_LIMIT: i64 = 20;

/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 100;

/// `?limit=&offset=`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// `GET /projects?status=&priority=&category=`
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub category: Option<ProjectCategory>,
}

/// `GET /tasks?project=&status=&priority=&assigned_to=`
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub project: Option<DbId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<DbId>,
}

/// `GET /comments?task=` or `GET /comments?project=`
#[derive(Debug, Default, Deserialize)]
pub struct CommentQuery {
    pub task: Option<DbId>,
    pub project: Option<DbId>,
}

/// `GET /notifications?unread_only=&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl NotificationQuery {
    pub fn page(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

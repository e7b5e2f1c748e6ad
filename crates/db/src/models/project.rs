//! Project entity model, membership rows, and DTOs.

use collabspace_core::access::Member;
use collabspace_core::priority::Priority;
use collabspace_core::project::{self, ProjectCategory, ProjectSettings, ProjectStatus};
use collabspace_core::roles::ProjectRole;
use collabspace_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    #[sqlx(try_from = "String")]
    pub category: ProjectCategory,
    pub owner_id: DbId,
    pub team_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub tags: Vec<String>,
    #[sqlx(json)]
    pub settings: ProjectSettings,
    #[sqlx(flatten)]
    pub stats: ProjectStats,
    pub progress: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Denormalized counters maintained by the stats service.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct ProjectStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub total_members: i64,
}

impl Project {
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        project::is_overdue(self.deadline, self.status, now)
    }
}

/// A row from the `project_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub project_id: DbId,
    pub user_id: DbId,
    #[sqlx(try_from = "String")]
    pub role: ProjectRole,
    pub joined_at: Timestamp,
}

impl Member<ProjectRole> for ProjectMember {
    fn user_id(&self) -> DbId {
        self.user_id
    }

    fn role(&self) -> ProjectRole {
        self.role
    }
}

/// A project together with its membership list and derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub members: Vec<ProjectMember>,
    pub is_overdue: bool,
}

/// DTO for creating a new project. The owner is added as a member separately.
#[derive(Debug, Clone, Default)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub category: ProjectCategory,
    pub owner_id: DbId,
    pub team_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub tags: Vec<String>,
    pub settings: ProjectSettings,
}

/// DTO for updating a project. `None` leaves the column unchanged.
///
/// The team link is changed through `ProjectRepo::set_team` so that both the
/// old and new team can be recomputed.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub category: Option<ProjectCategory>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub tags: Option<Vec<String>>,
    pub settings: Option<ProjectSettings>,
}

/// Optional filters for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub category: Option<ProjectCategory>,
}

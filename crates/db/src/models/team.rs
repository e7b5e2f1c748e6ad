//! Team entity model, membership rows, and DTOs.

use collabspace_core::access::Member;
use collabspace_core::roles::TeamRole;
use collabspace_core::team::{self, TeamCategory, TeamSettings};
use collabspace_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `teams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub lead_id: DbId,
    #[sqlx(try_from = "String")]
    pub category: TeamCategory,
    pub avatar: String,
    #[sqlx(json)]
    pub settings: TeamSettings,
    pub is_active: bool,
    #[sqlx(flatten)]
    pub stats: TeamStats,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct TeamStats {
    pub total_projects: i64,
    pub completed_projects: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub total_points: i64,
}

/// A row from the `team_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub team_id: DbId,
    pub user_id: DbId,
    #[sqlx(try_from = "String")]
    pub role: TeamRole,
    pub joined_at: Timestamp,
}

impl Member<TeamRole> for TeamMember {
    fn user_id(&self) -> DbId {
        self.user_id
    }

    fn role(&self) -> TeamRole {
        self.role
    }
}

/// A team with members, linked projects, and derived figures.
#[derive(Debug, Clone, Serialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: Team,
    pub members: Vec<TeamMember>,
    pub projects: Vec<DbId>,
    pub size: usize,
    pub productivity_rate: i32,
}

impl TeamDetail {
    pub fn new(team: Team, members: Vec<TeamMember>, projects: Vec<DbId>) -> Self {
        let productivity_rate =
            team::productivity_rate(team.stats.completed_tasks, team.stats.total_tasks);
        Self {
            size: members.len(),
            productivity_rate,
            team,
            members,
            projects,
        }
    }
}

/// DTO for creating a team. The lead is added as a member separately.
#[derive(Debug, Clone)]
pub struct CreateTeam {
    pub name: String,
    pub description: Option<String>,
    pub lead_id: DbId,
    pub category: TeamCategory,
    pub avatar: String,
    pub settings: TeamSettings,
}

/// DTO for updating a team. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<TeamCategory>,
    pub avatar: Option<String>,
    pub settings: Option<TeamSettings>,
    pub is_active: Option<bool>,
}

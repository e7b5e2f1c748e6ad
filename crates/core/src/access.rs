//! Membership-based access predicates.
//!
//! Every check runs against a membership list the caller has just loaded;
//! nothing here caches. Predicates return `bool`; the `ensure_*` helpers
//! turn a failed check into [`CoreError::Forbidden`].

use crate::error::CoreError;
use crate::roles::{ProjectRole, TeamRole};
use crate::types::DbId;

/// A single membership entry: who, and in which role.
pub trait Member<R> {
    fn user_id(&self) -> DbId;
    fn role(&self) -> R;
}

impl<R: Copy> Member<R> for (DbId, R) {
    fn user_id(&self) -> DbId {
        self.0
    }

    fn role(&self) -> R {
        self.1
    }
}

fn role_of<R, M: Member<R>>(members: &[M], user_id: DbId) -> Option<R> {
    members
        .iter()
        .find(|m| m.user_id() == user_id)
        .map(|m| m.role())
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Effective role of `user_id` in a project. The owner is always `Owner`.
pub fn project_role<M: Member<ProjectRole>>(
    owner_id: DbId,
    members: &[M],
    user_id: DbId,
) -> Option<ProjectRole> {
    if owner_id == user_id {
        return Some(ProjectRole::Owner);
    }
    role_of(members, user_id)
}

pub fn can_view_project<M: Member<ProjectRole>>(
    owner_id: DbId,
    members: &[M],
    user_id: DbId,
) -> bool {
    project_role(owner_id, members, user_id).is_some()
}

pub fn can_manage_project<M: Member<ProjectRole>>(
    owner_id: DbId,
    members: &[M],
    user_id: DbId,
) -> bool {
    project_role(owner_id, members, user_id).is_some_and(ProjectRole::can_manage)
}

pub fn can_contribute_to_project<M: Member<ProjectRole>>(
    owner_id: DbId,
    members: &[M],
    user_id: DbId,
) -> bool {
    project_role(owner_id, members, user_id).is_some_and(ProjectRole::can_contribute)
}

pub fn can_delete_project(owner_id: DbId, user_id: DbId) -> bool {
    owner_id == user_id
}

pub fn ensure_project_viewer<M: Member<ProjectRole>>(
    owner_id: DbId,
    members: &[M],
    user_id: DbId,
) -> Result<(), CoreError> {
    ensure(
        can_view_project(owner_id, members, user_id),
        "Not authorized to access this project",
    )
}

pub fn ensure_project_contributor<M: Member<ProjectRole>>(
    owner_id: DbId,
    members: &[M],
    user_id: DbId,
) -> Result<(), CoreError> {
    ensure(
        can_contribute_to_project(owner_id, members, user_id),
        "Project viewers cannot modify tasks",
    )
}

pub fn ensure_project_manager<M: Member<ProjectRole>>(
    owner_id: DbId,
    members: &[M],
    user_id: DbId,
) -> Result<(), CoreError> {
    ensure(
        can_manage_project(owner_id, members, user_id),
        "Not authorized to update this project",
    )
}

pub fn ensure_project_owner(owner_id: DbId, user_id: DbId) -> Result<(), CoreError> {
    ensure(
        can_delete_project(owner_id, user_id),
        "Only project owner can delete the project",
    )
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Effective role of `user_id` in a team. The lead is always `Lead`.
pub fn team_role<M: Member<TeamRole>>(
    lead_id: DbId,
    members: &[M],
    user_id: DbId,
) -> Option<TeamRole> {
    if lead_id == user_id {
        return Some(TeamRole::Lead);
    }
    role_of(members, user_id)
}

pub fn can_view_team<M: Member<TeamRole>>(lead_id: DbId, members: &[M], user_id: DbId) -> bool {
    team_role(lead_id, members, user_id).is_some()
}

pub fn can_manage_team<M: Member<TeamRole>>(lead_id: DbId, members: &[M], user_id: DbId) -> bool {
    team_role(lead_id, members, user_id).is_some_and(TeamRole::can_manage)
}

pub fn ensure_team_member<M: Member<TeamRole>>(
    lead_id: DbId,
    members: &[M],
    user_id: DbId,
) -> Result<(), CoreError> {
    ensure(
        can_view_team(lead_id, members, user_id),
        "Not authorized to access this team",
    )
}

pub fn ensure_team_manager<M: Member<TeamRole>>(
    lead_id: DbId,
    members: &[M],
    user_id: DbId,
) -> Result<(), CoreError> {
    ensure(
        can_manage_team(lead_id, members, user_id),
        "Not authorized to update this team",
    )
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

pub fn ensure_comment_author(author_id: DbId, user_id: DbId) -> Result<(), CoreError> {
    ensure(author_id == user_id, "Only the author can modify this comment")
}

fn ensure(allowed: bool, message: &str) -> Result<(), CoreError> {
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const OWNER: DbId = 1;
    const ADMIN: DbId = 2;
    const MEMBER: DbId = 3;
    const VIEWER: DbId = 4;
    const STRANGER: DbId = 99;

    fn project_members() -> Vec<(DbId, ProjectRole)> {
        vec![
            (OWNER, ProjectRole::Owner),
            (ADMIN, ProjectRole::Admin),
            (MEMBER, ProjectRole::Member),
            (VIEWER, ProjectRole::Viewer),
        ]
    }

    #[test]
    fn any_member_can_view_a_project() {
        let members = project_members();
        for user in [OWNER, ADMIN, MEMBER, VIEWER] {
            assert!(can_view_project(OWNER, &members, user));
        }
        assert!(!can_view_project(OWNER, &members, STRANGER));
    }

    #[test]
    fn owner_counts_even_without_membership_row() {
        let members: Vec<(DbId, ProjectRole)> = Vec::new();
        assert_eq!(project_role(OWNER, &members, OWNER), Some(ProjectRole::Owner));
        assert!(can_manage_project(OWNER, &members, OWNER));
    }

    #[test]
    fn only_owner_and_admin_manage_projects() {
        let members = project_members();
        assert!(can_manage_project(OWNER, &members, OWNER));
        assert!(can_manage_project(OWNER, &members, ADMIN));
        assert!(!can_manage_project(OWNER, &members, MEMBER));
        assert!(!can_manage_project(OWNER, &members, VIEWER));
    }

    #[test]
    fn viewer_reads_but_does_not_contribute() {
        let members = project_members();
        for user in [OWNER, ADMIN, MEMBER] {
            assert!(can_contribute_to_project(OWNER, &members, user));
        }
        assert!(can_view_project(OWNER, &members, VIEWER));
        assert_matches!(
            ensure_project_contributor(OWNER, &members, VIEWER),
            Err(CoreError::Forbidden(_))
        );
        assert!(!can_contribute_to_project(OWNER, &members, STRANGER));
    }

    #[test]
    fn only_owner_deletes_projects() {
        assert!(ensure_project_owner(OWNER, OWNER).is_ok());
        assert_matches!(ensure_project_owner(OWNER, ADMIN), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn stranger_is_forbidden_from_project() {
        let members = project_members();
        assert_matches!(
            ensure_project_viewer(OWNER, &members, STRANGER),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn team_lead_and_admin_manage_teams() {
        let members = vec![(10, TeamRole::Lead), (11, TeamRole::Admin), (12, TeamRole::Member)];
        assert!(can_manage_team(10, &members, 10));
        assert!(can_manage_team(10, &members, 11));
        assert!(!can_manage_team(10, &members, 12));
        assert!(can_view_team(10, &members, 12));
        assert!(ensure_team_member(10, &members, STRANGER).is_err());
    }

    #[test]
    fn only_author_edits_comment() {
        assert!(ensure_comment_author(5, 5).is_ok());
        assert!(ensure_comment_author(5, 6).is_err());
    }
}

//! Role enums: account-level roles and per-entity membership roles.

define_str_enum! {
    /// Account-level role carried in the JWT.
    UserRole {
        User => "user",
        Admin => "admin",
        Manager => "manager",
    }
}

define_str_enum! {
    /// A user's role inside a single project.
    ProjectRole {
        Owner => "owner",
        Admin => "admin",
        Member => "member",
        Viewer => "viewer",
    }
}

define_str_enum! {
    /// A user's role inside a single team.
    TeamRole {
        Lead => "lead",
        Admin => "admin",
        Member => "member",
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

impl ProjectRole {
    /// Roles allowed to update a project and manage its members.
    pub const MANAGERS: &'static [ProjectRole] = &[ProjectRole::Owner, ProjectRole::Admin];

    /// Roles allowed to create and change tasks. Viewers are read-only.
    pub const CONTRIBUTORS: &'static [ProjectRole] =
        &[ProjectRole::Owner, ProjectRole::Admin, ProjectRole::Member];

    pub fn can_manage(self) -> bool {
        Self::MANAGERS.contains(&self)
    }

    pub fn can_contribute(self) -> bool {
        Self::CONTRIBUTORS.contains(&self)
    }
}

impl TeamRole {
    /// Roles allowed to update a team and manage its members.
    pub const MANAGERS: &'static [TeamRole] = &[TeamRole::Lead, TeamRole::Admin];

    pub fn can_manage(self) -> bool {
        Self::MANAGERS.contains(&self)
    }
}

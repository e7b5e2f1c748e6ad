//! Project lifecycle enums and settings.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

define_str_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Planning => "planning",
        Active => "active",
        OnHold => "on-hold",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

define_str_enum! {
    /// Broad category used for filtering.
    ProjectCategory {
        Web => "web",
        Mobile => "mobile",
        Design => "design",
        Marketing => "marketing",
        Research => "research",
        Other => "other",
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

impl Default for ProjectCategory {
    fn default() -> Self {
        Self::Other
    }
}

/// Per-project settings stored as a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub is_public: bool,
    pub allow_comments: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            is_public: false,
            allow_comments: true,
        }
    }
}

/// A project is overdue when its deadline has passed and it is not completed.
pub fn is_overdue(deadline: Option<Timestamp>, status: ProjectStatus, now: Timestamp) -> bool {
    match deadline {
        Some(deadline) => status != ProjectStatus::Completed && now > deadline,
        None => false,
    }
}

//! Team categories, settings, and derived team figures.

use serde::{Deserialize, Serialize};

use crate::task::percentage;

/// Avatar assigned to teams created without one.
pub const DEFAULT_AVATAR_URL: &str = "https://ui-avatars.com/api/?name=Team&background=random";

define_str_enum! {
    /// Functional area a team works in.
    TeamCategory {
        Development => "development",
        Design => "design",
        Marketing => "marketing",
        Sales => "sales",
        Support => "support",
        Management => "management",
        Other => "other",
    }
}

impl Default for TeamCategory {
    fn default() -> Self {
        Self::Other
    }
}

/// Per-team settings stored as a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSettings {
    pub is_public: bool,
    pub allow_member_invites: bool,
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self {
            is_public: false,
            allow_member_invites: true,
        }
    }
}

/// Share of the team's tasks that are completed, as a rounded percentage.
pub fn productivity_rate(completed_tasks: i64, total_tasks: i64) -> i32 {
    percentage(completed_tasks, total_tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let settings: TeamSettings = serde_json::from_str(r#"{"is_public":true}"#).unwrap();
        assert!(settings.is_public);
        assert!(settings.allow_member_invites);
    }

    #[test]
    fn productivity_of_empty_team_is_zero() {
        assert_eq!(productivity_rate(0, 0), 0);
        assert_eq!(productivity_rate(2, 3), 67);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = TeamCategory::from_str_value("finance").unwrap_err();
        assert!(err.contains("development"));
    }
}

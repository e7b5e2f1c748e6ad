//! User entity model and DTOs.

use collabspace_core::roles::UserRole;
use collabspace_core::types::{DbId, Timestamp};
use collabspace_core::user::{self, Preferences};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub points: i64,
    pub level: i32,
    #[sqlx(json)]
    pub preferences: Preferences,
    pub last_active_at: Timestamp,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn full_name(&self) -> String {
        user::full_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.username,
        )
    }

    /// Whether this user opted into email notifications.
    pub fn wants_email(&self) -> bool {
        self.is_active && self.preferences.notifications.email
    }
}

/// DTO for inserting a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: String,
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    /// Already merged with the stored preferences.
    pub preferences: Option<Preferences>,
}

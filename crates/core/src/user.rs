//! Account preferences and password rules.

use serde::{Deserialize, Serialize};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: u64 = 6;

define_str_enum! {
    /// UI colour scheme preference.
    Theme {
        Light => "light",
        Dark => "dark",
        System => "system",
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::System
    }
}

/// Channels a user wants notifications delivered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationChannels {
    pub email: bool,
    pub push: bool,
}

impl Default for NotificationChannels {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
        }
    }
}

/// User preferences stored as a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub notifications: NotificationChannels,
}

/// Partial preferences from a profile update. Absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub notifications: Option<NotificationChannelsPatch>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NotificationChannelsPatch {
    pub email: Option<bool>,
    pub push: Option<bool>,
}

impl Preferences {
    /// Merge a partial update into these preferences.
    pub fn merge(mut self, patch: PreferencesPatch) -> Self {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(channels) = patch.notifications {
            if let Some(email) = channels.email {
                self.notifications.email = email;
            }
            if let Some(push) = channels.push {
                self.notifications.push = push;
            }
        }
        self
    }
}

/// Display name: first and last name joined, or the username when both are blank.
pub fn full_name(first_name: Option<&str>, last_name: Option<&str>, username: &str) -> String {
    let joined = format!(
        "{} {}",
        first_name.unwrap_or_default(),
        last_name.unwrap_or_default()
    );
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        username.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Generated avatar for a newly registered user.
pub fn default_avatar_url(username: &str) -> String {
    format!("https://ui-avatars.com/api/?name={username}&background=random")
}

/// Emails are compared and stored lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

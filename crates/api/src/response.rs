//! Shared response envelope types for API handlers.
//!
//! Successful responses look like
//! `{ "success": true, "message": "...", "<key>": <payload> }`, where the
//! message is optional and the key names the resource (`"project"`,
//! `"tasks"`, ...). Use [`ResourceResponse`] rather than ad-hoc
//! `serde_json::json!` so payloads stay typed.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// `{ success, message?, <key>: T }` envelope.
///
/// ```ignore
/// Ok(Json(ResourceResponse::new("project", detail).with_message("Project created successfully")))
/// ```
#[derive(Debug)]
pub struct ResourceResponse<T> {
    key: &'static str,
    message: Option<String>,
    data: T,
}

impl<T: Serialize> ResourceResponse<T> {
    pub fn new(key: &'static str, data: T) -> Self {
        Self {
            key,
            message: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> Serialize for ResourceResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.message.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("success", &true)?;
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        map.serialize_entry(self.key, &self.data)?;
        map.end()
    }
}

/// `{ success: true, message }` for operations with nothing to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

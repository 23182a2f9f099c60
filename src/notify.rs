//! Transient user-facing notifications.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Success".to_string(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.title, self.description)
    }
}

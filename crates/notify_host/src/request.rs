//! Notification display requests.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single notification to display. Each request is independent of every other one.
pub struct NotificationRequest {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Relative icon asset path. Not validated against real assets.
    pub icon: String,
    /// Whether the platform should suppress sound/vibration. Alerts are never silent.
    pub silent: bool,
}

impl NotificationRequest {
    /// Builds a non-silent request.
    pub fn new(title: impl Into<String>, body: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: icon.into(),
            silent: false,
        }
    }
}

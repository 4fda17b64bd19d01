//! Fixed user-facing text written to the status element and the confirmation notification.

use crate::PermissionState;

/// Status text when the host has no notification capability.
pub const STATUS_UNSUPPORTED: &str = "Your browser does not support desktop notifications.";
/// Status text when permission is granted.
pub const STATUS_GRANTED: &str = "Notifications enabled!";
/// Status text when permission is denied.
pub const STATUS_DENIED: &str = "Notification permission denied.";
/// Status text inviting the user to press the enable button.
pub const STATUS_PROMPT: &str = "Click the button to enable notifications.";

/// Title of the notification sent right after permission is granted.
pub const CONFIRMATION_TITLE: &str = "Notifications Enabled";
/// Body of the notification sent right after permission is granted.
pub const CONFIRMATION_BODY: &str =
    "You will receive alerts when prices reach your configured values.";

/// Returns the page-ready status text for a permission state.
pub const fn status_message_for(state: PermissionState) -> &'static str {
    match state {
        PermissionState::Unsupported => STATUS_UNSUPPORTED,
        PermissionState::Granted => STATUS_GRANTED,
        PermissionState::Denied => STATUS_DENIED,
        PermissionState::Default => STATUS_PROMPT,
    }
}

//! Error type shared by notifier contracts and adapters.

use thiserror::Error;

use crate::PermissionState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures surfaced by notification operations. None of these are fatal to the host page.
pub enum NotifyError {
    /// The host exposes no notification capability.
    #[error("notifications are not supported")]
    Unsupported,
    /// A display was attempted while permission was not granted.
    #[error("notification permission is {0}")]
    PermissionNotGranted(PermissionState),
    /// The platform rejected a notification or permission call.
    #[error("platform notification call failed: {0}")]
    Platform(String),
    /// Notifier configuration failed validation.
    #[error("invalid notifier config: {0}")]
    InvalidConfig(String),
}

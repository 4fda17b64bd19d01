//! Notification permission state as reported by the host platform.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Four-valued permission state. The platform owns this value; adapters read it on demand.
pub enum PermissionState {
    /// The host exposes no notification capability at all.
    Unsupported,
    /// The user has not been prompted yet (or dismissed the prompt).
    #[default]
    Default,
    /// Notifications may be displayed.
    Granted,
    /// The user refused notifications.
    Denied,
}

impl PermissionState {
    /// Parses a platform permission token (`"default"`, `"granted"`, `"denied"`).
    ///
    /// Unknown tokens map to [`PermissionState::Default`], the state that never displays
    /// anything and still allows prompting.
    pub fn from_token(token: &str) -> Self {
        match token {
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            _ => Self::Default,
        }
    }

    /// Returns the platform token for this state.
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Unsupported => "unsupported",
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    /// Returns `true` only for [`PermissionState::Granted`].
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_tokens_parse_with_default_fallback() {
        assert_eq!(PermissionState::from_token("granted"), PermissionState::Granted);
        assert_eq!(PermissionState::from_token("denied"), PermissionState::Denied);
        assert_eq!(PermissionState::from_token("default"), PermissionState::Default);
        assert_eq!(PermissionState::from_token("prompt"), PermissionState::Default);
    }

    #[test]
    fn only_granted_is_granted() {
        assert!(PermissionState::Granted.is_granted());
        assert!(!PermissionState::Default.is_granted());
        assert!(!PermissionState::Denied.is_granted());
        assert!(!PermissionState::Unsupported.is_granted());
    }
}

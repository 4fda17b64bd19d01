//! Notifier configuration supplied by the host page.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AlertCatalog, NotifyError, SymbolProfile, DEFAULT_ICON, FALLBACK_TITLE};

/// Element id of the status text target.
pub const DEFAULT_STATUS_ELEMENT_ID: &str = "notifications-status";
/// Element id of the enable button.
pub const DEFAULT_ENABLE_BUTTON_ID: &str = "enable-notifications-button";
/// Delay between DOM readiness and page init, letting the dashboard finish rendering.
pub const DEFAULT_READY_DELAY_MS: u64 = 1000;
/// Lifetime of a displayed notification before it is dismissed automatically.
pub const DEFAULT_AUTO_DISMISS_MS: u64 = 5000;
/// Global function name exported for the alert producer.
pub const DEFAULT_ENTRY_POINT: &str = "notifyFromDash";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Host-page settings. Every field has a default, so an empty object is a valid config.
pub struct NotifierConfig {
    /// Id of the element that receives status text.
    pub status_element_id: String,
    /// Id of the button that triggers the permission prompt.
    pub enable_button_id: String,
    /// Page-init delay in milliseconds.
    pub ready_delay_ms: u64,
    /// Auto-dismiss interval in milliseconds.
    pub auto_dismiss_ms: u64,
    /// Icon for the confirmation notification and unrecognized symbols.
    pub default_icon: String,
    /// Title for unrecognized symbols.
    pub fallback_title: String,
    /// Name of the global entry point published on `window`.
    pub entry_point: String,
    /// Symbol table override. `None` keeps the built-in currencies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<SymbolProfile>>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            status_element_id: DEFAULT_STATUS_ELEMENT_ID.to_string(),
            enable_button_id: DEFAULT_ENABLE_BUTTON_ID.to_string(),
            ready_delay_ms: DEFAULT_READY_DELAY_MS,
            auto_dismiss_ms: DEFAULT_AUTO_DISMISS_MS,
            default_icon: DEFAULT_ICON.to_string(),
            fallback_title: FALLBACK_TITLE.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            catalog: None,
        }
    }
}

impl NotifierConfig {
    /// Parses and validates a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidConfig`] when the JSON is malformed or fails
    /// [`NotifierConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, NotifyError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| NotifyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that ids, the entry point, and the dismiss interval are usable.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), NotifyError> {
        let required = [
            ("statusElementId", &self.status_element_id),
            ("enableButtonId", &self.enable_button_id),
            ("entryPoint", &self.entry_point),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(NotifyError::InvalidConfig(format!("{field} must not be empty")));
        }
        if self.auto_dismiss_ms == 0 {
            return Err(NotifyError::InvalidConfig(
                "autoDismissMs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Page-init delay.
    pub fn ready_delay(&self) -> Duration {
        Duration::from_millis(self.ready_delay_ms)
    }

    /// Auto-dismiss interval.
    pub fn auto_dismiss(&self) -> Duration {
        Duration::from_millis(self.auto_dismiss_ms)
    }

    /// Builds the symbol catalog described by this config.
    pub fn catalog(&self) -> AlertCatalog {
        let entries = self
            .catalog
            .clone()
            .unwrap_or_else(AlertCatalog::builtin_entries);
        AlertCatalog::new(entries, self.fallback_title.clone(), self.default_icon.clone())
    }
}

//! Concrete adapter wiring for the browser host.

use std::rc::Rc;

use notify_host::{NotificationAdapter, NotifierConfig};

use crate::{WebEnableControl, WebNotificationCapability, WebStatusDisplay, WebTaskScheduler};

/// Notification adapter over the browser capabilities in this crate.
pub type WebNotificationAdapter = NotificationAdapter<
    WebNotificationCapability,
    WebStatusDisplay,
    WebEnableControl,
    WebTaskScheduler,
>;

/// Builds a browser adapter targeting the page elements named in `config`.
pub fn build_adapter(config: &NotifierConfig) -> Rc<WebNotificationAdapter> {
    Rc::new(NotificationAdapter::new(
        WebNotificationCapability,
        WebStatusDisplay::new(config.status_element_id.clone()),
        WebEnableControl::new(config.enable_button_id.clone()),
        WebTaskScheduler,
        config,
    ))
}

#[cfg(test)]
mod tests {
    use notify_host::{AlertEvent, NotifyError};
    use serde_json::json;

    use super::*;

    #[test]
    fn native_adapter_degrades_to_unsupported() {
        let adapter = build_adapter(&NotifierConfig::default());

        assert!(!adapter.check_support());
        assert_eq!(
            futures::executor::block_on(adapter.request_permission()),
            Err(NotifyError::Unsupported)
        );
        adapter.on_page_ready();
        assert!(!adapter.wire_enable_button());
        adapter.schedule_page_init();
        adapter.notify_from_external_source(&[AlertEvent::new("ETH", "Price crossed $3000")]);
        adapter.notify_from_json(json!([{"symbol": "BTC", "message": "up"}]));
    }

    #[test]
    fn adapter_uses_configured_catalog() {
        let config = NotifierConfig::from_json(
            r#"{"catalog": [{"code": "DOGE", "title": "Dogecoin Alert", "icon": "assets/doge.png"}]}"#,
        )
        .expect("config");
        let adapter = build_adapter(&config);

        assert_eq!(adapter.catalog().entries().len(), 1);
        assert_eq!(adapter.catalog().entries()[0].title, "Dogecoin Alert");
    }
}

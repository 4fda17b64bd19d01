//! Notification adapter: permission flow, gated display, status mirroring, and alert fan-out.

use std::{
    rc::{Rc, Weak},
    time::Duration,
};

use leptos::logging::{error, log, warn};
use serde_json::Value;

use crate::{
    decode_alert_batch, status_message_for, AlertCatalog, AlertEvent, EnableControl,
    NotificationCapability, NotificationRequest, NotifierConfig, NotifyError, StatusDisplay,
    TaskScheduler, CONFIRMATION_BODY, CONFIRMATION_TITLE, STATUS_DENIED, STATUS_GRANTED,
    STATUS_UNSUPPORTED,
};

/// Drives a notification capability on behalf of the dashboard page.
///
/// The adapter holds no permission state of its own: every operation reads the capability's
/// current [`crate::PermissionState`] when it runs.
pub struct NotificationAdapter<N, S, E, T> {
    notifications: Rc<N>,
    status: S,
    enable: E,
    scheduler: T,
    catalog: AlertCatalog,
    default_icon: String,
    ready_delay: Duration,
    auto_dismiss: Duration,
}

impl<N, S, E, T> NotificationAdapter<N, S, E, T>
where
    N: NotificationCapability + 'static,
    S: StatusDisplay + 'static,
    E: EnableControl + 'static,
    T: TaskScheduler + 'static,
{
    /// Builds an adapter over injected host capabilities.
    pub fn new(
        notifications: N,
        status: S,
        enable: E,
        scheduler: T,
        config: &NotifierConfig,
    ) -> Self {
        Self {
            notifications: Rc::new(notifications),
            status,
            enable,
            scheduler,
            catalog: config.catalog(),
            default_icon: config.default_icon.clone(),
            ready_delay: config.ready_delay(),
            auto_dismiss: config.auto_dismiss(),
        }
    }

    /// Returns whether the host exposes notifications.
    pub fn check_support(&self) -> bool {
        self.notifications.is_supported()
    }

    /// Prompts for permission and mirrors the answer into the status display.
    ///
    /// On grant, one confirmation notification is sent with the default icon. Each grant sends
    /// its own confirmation, including repeated grants in the same session.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Unsupported`] without prompting when the host has no
    /// notifications, or the platform error when the prompt itself fails.
    pub async fn request_permission(&self) -> Result<bool, NotifyError> {
        if !self.check_support() {
            self.update_status_display(STATUS_UNSUPPORTED);
            return Err(NotifyError::Unsupported);
        }

        let answer = self.notifications.request_permission().await?;
        if answer.is_granted() {
            self.update_status_display(STATUS_GRANTED);
            self.send_notification(CONFIRMATION_TITLE, CONFIRMATION_BODY, &self.default_icon);
            Ok(true)
        } else {
            self.update_status_display(STATUS_DENIED);
            Ok(false)
        }
    }

    /// Displays a notification if the host supports it and permission is granted right now.
    ///
    /// An empty `icon` falls back to the default icon. Dropped and failed sends are logged,
    /// never returned.
    pub fn send_notification(&self, title: &str, body: &str, icon: &str) {
        let icon = if icon.is_empty() {
            self.default_icon.as_str()
        } else {
            icon
        };
        let request = NotificationRequest::new(title, body, icon);
        match self.try_send(&request) {
            Ok(()) => {}
            Err(err @ (NotifyError::Unsupported | NotifyError::PermissionNotGranted(_))) => {
                log!("notification `{title}` dropped: {err}");
            }
            Err(err) => error!("notification `{title}` failed: {err}"),
        }
    }

    /// Gated display with auto-dismiss and click-to-focus.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Unsupported`] or [`NotifyError::PermissionNotGranted`] when the
    /// gate refuses, and the platform error when construction fails.
    pub fn try_send(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        if !self.check_support() {
            return Err(NotifyError::Unsupported);
        }
        let permission = self.notifications.permission();
        if !permission.is_granted() {
            return Err(NotifyError::PermissionNotGranted(permission));
        }

        let notification = self.notifications.display(request)?;

        let host = Rc::clone(&self.notifications);
        let clicked = Rc::downgrade(&notification);
        notification.on_click(Box::new(move || {
            host.focus_host();
            if let Some(notification) = clicked.upgrade() {
                notification.close();
            }
        }));

        self.scheduler
            .schedule(self.auto_dismiss, Box::new(move || notification.close()));
        Ok(())
    }

    /// Writes `message` to the status element when the page has one.
    pub fn update_status_display(&self, message: &str) {
        self.status.set_status(message);
    }

    /// Mirrors the current support and permission state into the status element.
    pub fn on_page_ready(&self) {
        let message = if self.check_support() {
            status_message_for(self.notifications.permission())
        } else {
            STATUS_UNSUPPORTED
        };
        self.update_status_display(message);
    }

    /// Binds the enable button to [`Self::request_permission`]. Returns `false` when the page
    /// has no button.
    pub fn wire_enable_button(self: &Rc<Self>) -> bool {
        let adapter: Weak<Self> = Rc::downgrade(self);
        self.enable.bind_activation(Box::new(move || {
            let Some(adapter) = adapter.upgrade() else {
                return;
            };
            let task_adapter = Rc::clone(&adapter);
            adapter.scheduler.spawn(Box::pin(async move {
                match task_adapter.request_permission().await {
                    Ok(_) => {}
                    Err(NotifyError::Unsupported) => {
                        log!("notification permission not requested: unsupported");
                    }
                    Err(err) => error!("notification permission request failed: {err}"),
                }
            }));
        }))
    }

    /// Runs [`Self::on_page_ready`] and [`Self::wire_enable_button`] once the ready delay has
    /// elapsed.
    pub fn schedule_page_init(self: &Rc<Self>) {
        let adapter = Rc::clone(self);
        self.scheduler.schedule(
            self.ready_delay,
            Box::new(move || {
                adapter.on_page_ready();
                adapter.wire_enable_button();
            }),
        );
    }

    /// Sends one notification per alert, in input order, titled and iconed by symbol.
    pub fn notify_from_external_source(&self, alerts: &[AlertEvent]) {
        for alert in alerts {
            let profile = self.catalog.resolve(&alert.symbol);
            self.send_notification(&profile.title, &alert.message, &profile.icon);
        }
    }

    /// Decodes a raw producer payload and forwards it to
    /// [`Self::notify_from_external_source`]. Payloads that do not decode are ignored.
    pub fn notify_from_json(&self, payload: Value) {
        match decode_alert_batch(payload) {
            Ok(alerts) if alerts.is_empty() => log!("alert batch empty; nothing to notify"),
            Ok(alerts) => self.notify_from_external_source(&alerts),
            Err(err) => warn!("ignoring malformed alert batch: {err}"),
        }
    }

    /// Symbol catalog in use.
    pub fn catalog(&self) -> &AlertCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        ManualScheduler, MemoryEnableControl, MemoryNotificationHost, MemoryStatusDisplay,
        NoopEnableControl, NoopStatusDisplay, PermissionState, UnsupportedNotificationCapability,
        DEFAULT_ICON, STATUS_PROMPT,
    };

    type TestAdapter = NotificationAdapter<
        MemoryNotificationHost,
        MemoryStatusDisplay,
        MemoryEnableControl,
        ManualScheduler,
    >;

    struct Fixture {
        host: MemoryNotificationHost,
        status: MemoryStatusDisplay,
        button: MemoryEnableControl,
        scheduler: ManualScheduler,
        adapter: Rc<TestAdapter>,
    }

    fn fixture_with(
        permission: PermissionState,
        status: MemoryStatusDisplay,
        button: MemoryEnableControl,
    ) -> Fixture {
        let host = MemoryNotificationHost::new(permission);
        let scheduler = ManualScheduler::new();
        let adapter = Rc::new(NotificationAdapter::new(
            host.clone(),
            status.clone(),
            button.clone(),
            scheduler.clone(),
            &NotifierConfig::default(),
        ));
        Fixture {
            host,
            status,
            button,
            scheduler,
            adapter,
        }
    }

    fn fixture(permission: PermissionState) -> Fixture {
        fixture_with(
            permission,
            MemoryStatusDisplay::new(),
            MemoryEnableControl::new(),
        )
    }

    fn titles(host: &MemoryNotificationHost) -> Vec<String> {
        host.displayed_requests()
            .into_iter()
            .map(|request| request.title)
            .collect()
    }

    #[test]
    fn page_ready_writes_fixed_status_for_each_permission_state() {
        let cases = [
            (
                PermissionState::Unsupported,
                "Your browser does not support desktop notifications.",
            ),
            (PermissionState::Granted, "Notifications enabled!"),
            (PermissionState::Denied, "Notification permission denied."),
            (
                PermissionState::Default,
                "Click the button to enable notifications.",
            ),
        ];

        for (permission, expected) in cases {
            let fx = fixture(permission);
            fx.adapter.on_page_ready();
            assert_eq!(fx.status.history(), vec![expected.to_string()]);
            assert_eq!(fx.host.prompt_count(), 0);
        }
    }

    #[test]
    fn absent_status_element_is_not_an_error() {
        let fx = fixture_with(
            PermissionState::Granted,
            MemoryStatusDisplay::absent(),
            MemoryEnableControl::new(),
        );
        fx.adapter.on_page_ready();
        fx.adapter.update_status_display("anything");
        assert!(fx.status.history().is_empty());
    }

    #[test]
    fn send_is_refused_without_support_or_grant() {
        for permission in [
            PermissionState::Unsupported,
            PermissionState::Default,
            PermissionState::Denied,
        ] {
            let fx = fixture(permission);
            fx.adapter
                .send_notification("Bitcoin Alert", "Price crossed", DEFAULT_ICON);

            let refused = fx
                .adapter
                .try_send(&NotificationRequest::new("t", "b", DEFAULT_ICON));
            match permission {
                PermissionState::Unsupported => assert_eq!(refused, Err(NotifyError::Unsupported)),
                other => assert_eq!(refused, Err(NotifyError::PermissionNotGranted(other))),
            }
            assert!(fx.host.displayed().is_empty());
            assert_eq!(fx.scheduler.pending_timers(), 0);
        }
    }

    #[test]
    fn permission_is_rechecked_on_every_send() {
        let fx = fixture(PermissionState::Granted);
        fx.adapter.send_notification("first", "", DEFAULT_ICON);
        fx.host.set_permission(PermissionState::Denied);
        fx.adapter.send_notification("second", "", DEFAULT_ICON);

        assert_eq!(titles(&fx.host), vec!["first".to_string()]);
    }

    #[test]
    fn displayed_notification_is_audible_and_dismissed_after_five_seconds() {
        let fx = fixture(PermissionState::Granted);
        fx.adapter
            .send_notification("Solana Alert", "SOL fell 5.00% today", "assets/sol.png");

        let displayed = fx.host.displayed();
        assert_eq!(displayed.len(), 1);
        assert!(!displayed[0].request().silent);

        fx.scheduler.advance(Duration::from_millis(4999));
        assert!(!displayed[0].is_closed());
        fx.scheduler.advance(Duration::from_millis(1));
        assert!(displayed[0].is_closed());
        assert_eq!(fx.host.focus_count(), 0);
    }

    #[test]
    fn click_focuses_host_and_dismisses_early() {
        let fx = fixture(PermissionState::Granted);
        fx.adapter.send_notification("Bitcoin Alert", "BTC up", DEFAULT_ICON);

        let notification = &fx.host.displayed()[0];
        assert!(notification.has_click_handler());
        notification.click();

        assert!(notification.is_closed());
        assert_eq!(fx.host.focus_count(), 1);

        // The pending auto-dismiss still fires and is harmless.
        assert_eq!(fx.scheduler.advance(Duration::from_millis(5000)), 1);
        assert!(notification.is_closed());
    }

    #[test]
    fn construction_failure_does_not_stop_later_notifications() {
        let fx = fixture(PermissionState::Granted);
        fx.host.reject_title("Bitcoin Alert");

        let refused = fx
            .adapter
            .try_send(&NotificationRequest::new("Bitcoin Alert", "x", DEFAULT_ICON));
        assert!(matches!(refused, Err(NotifyError::Platform(_))));

        fx.adapter.notify_from_external_source(&[
            AlertEvent::new("BTC", "rejected"),
            AlertEvent::new("ETH", "accepted"),
        ]);
        assert_eq!(titles(&fx.host), vec!["Ethereum Alert".to_string()]);
    }

    #[test]
    fn grant_sends_exactly_one_confirmation_with_default_icon() {
        let fx = fixture(PermissionState::Default);
        fx.host.answer_prompts_with(PermissionState::Granted);

        assert_eq!(block_on(fx.adapter.request_permission()), Ok(true));
        assert_eq!(fx.status.current().as_deref(), Some(STATUS_GRANTED));
        assert_eq!(
            fx.host.displayed_requests(),
            vec![NotificationRequest::new(
                CONFIRMATION_TITLE,
                CONFIRMATION_BODY,
                DEFAULT_ICON
            )]
        );
    }

    #[test]
    fn repeated_grants_each_send_a_confirmation() {
        let fx = fixture(PermissionState::Default);
        fx.host.answer_prompts_with(PermissionState::Granted);

        block_on(fx.adapter.request_permission()).expect("first grant");
        block_on(fx.adapter.request_permission()).expect("second grant");

        assert_eq!(fx.host.prompt_count(), 2);
        assert_eq!(
            titles(&fx.host),
            vec![CONFIRMATION_TITLE.to_string(), CONFIRMATION_TITLE.to_string()]
        );
    }

    #[test]
    fn refusal_writes_denied_status_and_resolves_false() {
        for answer in [PermissionState::Denied, PermissionState::Default] {
            let fx = fixture(PermissionState::Default);
            fx.host.answer_prompts_with(answer);

            assert_eq!(block_on(fx.adapter.request_permission()), Ok(false));
            assert_eq!(fx.status.current().as_deref(), Some(STATUS_DENIED));
            assert!(fx.host.displayed().is_empty());
        }
    }

    #[test]
    fn unsupported_request_fails_without_prompting() {
        let fx = fixture(PermissionState::Unsupported);

        assert_eq!(
            block_on(fx.adapter.request_permission()),
            Err(NotifyError::Unsupported)
        );
        assert_eq!(fx.status.current().as_deref(), Some(STATUS_UNSUPPORTED));
        assert_eq!(fx.host.prompt_count(), 0);
    }

    #[test]
    fn cancelled_prompt_surfaces_platform_error_and_leaves_status() {
        let fx = fixture(PermissionState::Default);
        fx.adapter.on_page_ready();

        let outcome = Rc::new(RefCell::new(None));
        let adapter = Rc::clone(&fx.adapter);
        let slot = Rc::clone(&outcome);
        fx.scheduler.spawn(Box::pin(async move {
            *slot.borrow_mut() = Some(adapter.request_permission().await);
        }));
        fx.scheduler.run_until_stalled();
        assert_eq!(fx.host.pending_prompt_count(), 1);

        fx.host.cancel_prompts();
        fx.scheduler.run_until_stalled();
        assert!(matches!(
            outcome.borrow().as_ref(),
            Some(Err(NotifyError::Platform(_)))
        ));
        assert_eq!(fx.status.history(), vec![STATUS_PROMPT.to_string()]);
    }

    #[test]
    fn enable_button_prompts_and_waits_for_the_user() {
        let fx = fixture(PermissionState::Default);
        assert!(fx.adapter.wire_enable_button());
        assert!(fx.button.is_bound());

        assert!(fx.button.activate());
        fx.scheduler.run_until_stalled();
        assert_eq!(fx.host.pending_prompt_count(), 1);
        assert!(fx.status.history().is_empty());

        fx.host.respond_to_prompts(PermissionState::Granted);
        fx.scheduler.run_until_stalled();
        assert_eq!(fx.status.current().as_deref(), Some(STATUS_GRANTED));
        assert_eq!(titles(&fx.host), vec![CONFIRMATION_TITLE.to_string()]);
    }

    #[test]
    fn missing_enable_button_is_skipped() {
        let fx = fixture_with(
            PermissionState::Default,
            MemoryStatusDisplay::new(),
            MemoryEnableControl::absent(),
        );
        assert!(!fx.adapter.wire_enable_button());
        assert!(!fx.button.activate());
    }

    #[test]
    fn page_init_runs_after_ready_delay() {
        let fx = fixture(PermissionState::Denied);
        fx.adapter.schedule_page_init();

        fx.scheduler.advance(Duration::from_millis(999));
        assert!(fx.status.history().is_empty());
        assert!(!fx.button.is_bound());

        fx.scheduler.advance(Duration::from_millis(1));
        assert_eq!(fx.status.history(), vec![STATUS_DENIED.to_string()]);
        assert!(fx.button.is_bound());
        assert_eq!(fx.host.prompt_count(), 0);
    }

    #[test]
    fn absent_non_array_empty_and_malformed_batches_are_ignored() {
        let fx = fixture(PermissionState::Granted);
        for payload in [
            json!(null),
            json!({"symbol": "BTC", "message": "not wrapped"}),
            json!([]),
            json!([{"symbol": "BTC", "message": "ok"}, "garbage"]),
        ] {
            fx.adapter.notify_from_json(payload);
        }
        fx.adapter.notify_from_external_source(&[]);

        assert!(fx.host.displayed().is_empty());
    }

    #[test]
    fn batch_fans_out_in_order_with_catalog_titles() {
        let fx = fixture(PermissionState::Granted);
        fx.adapter.notify_from_json(json!([
            {"symbol": "SOL", "type": "percent", "message": "m1"},
            {"symbol": "BTC", "type": "price", "message": "m2"},
            {"symbol": "XRP", "message": "m3"},
            {"symbol": "USDD", "message": "m4"},
            {"symbol": "ETH", "message": "m5"},
        ]));

        let shown: Vec<(String, String, String)> = fx
            .host
            .displayed_requests()
            .into_iter()
            .map(|request| (request.title, request.body, request.icon))
            .collect();
        let expected: Vec<(String, String, String)> = [
            ("Solana Alert", "m1", "assets/sol.png"),
            ("Bitcoin Alert", "m2", "assets/btc.png"),
            ("Crypto Alert", "m3", DEFAULT_ICON),
            ("Digital Dollar Alert", "m4", "assets/usdd.png"),
            ("Ethereum Alert", "m5", "assets/eth.png"),
        ]
        .into_iter()
        .map(|(t, b, i)| (t.to_string(), b.to_string(), i.to_string()))
        .collect();
        assert_eq!(shown, expected);
        assert_eq!(fx.scheduler.pending_timers(), 5);
    }

    #[test]
    fn ethereum_alert_is_shown_then_auto_dismissed() {
        let fx = fixture(PermissionState::Granted);
        fx.adapter
            .notify_from_external_source(&[AlertEvent::new("ETH", "Price crossed $3000")]);

        assert_eq!(
            fx.host.displayed_requests(),
            vec![NotificationRequest::new(
                "Ethereum Alert",
                "Price crossed $3000",
                "assets/eth.png"
            )]
        );
        fx.scheduler.advance(Duration::from_millis(5000));
        assert!(fx.host.displayed()[0].is_closed());
    }

    #[test]
    fn unrecognized_symbol_uses_generic_alert() {
        let fx = fixture(PermissionState::Granted);
        fx.adapter
            .notify_from_external_source(&[AlertEvent::new("XRP", "XRP moved")]);

        assert_eq!(
            fx.host.displayed_requests(),
            vec![NotificationRequest::new("Crypto Alert", "XRP moved", DEFAULT_ICON)]
        );
    }

    #[test]
    fn empty_icon_falls_back_to_default_icon() {
        let fx = fixture(PermissionState::Granted);
        fx.adapter.send_notification("t", "b", "");
        assert_eq!(
            fx.host.displayed_requests(),
            vec![NotificationRequest::new("t", "b", DEFAULT_ICON)]
        );
    }

    #[test]
    fn null_message_next_to_valid_alerts_still_notifies() {
        let fx = fixture(PermissionState::Granted);
        fx.adapter.notify_from_json(json!([
            {"symbol": "BTC", "message": "ok"},
            {"symbol": "ETH", "message": null},
            {"symbol": "SOL", "message": 3000},
        ]));
        assert_eq!(
            fx.host.displayed_requests(),
            vec![
                NotificationRequest::new("Bitcoin Alert", "ok", "assets/btc.png"),
                NotificationRequest::new("Ethereum Alert", "", "assets/eth.png"),
                NotificationRequest::new("Solana Alert", "3000", "assets/sol.png"),
            ]
        );
    }

    /// Capability that claims the prompt state even though it has no notifications.
    struct InconsistentCapability;

    impl NotificationCapability for InconsistentCapability {
        fn is_supported(&self) -> bool {
            false
        }

        fn permission(&self) -> PermissionState {
            PermissionState::Default
        }

        fn request_permission(&self) -> crate::PermissionFuture<'_> {
            Box::pin(async { Err(NotifyError::Unsupported) })
        }

        fn display(
            &self,
            _request: &NotificationRequest,
        ) -> Result<Rc<dyn crate::DisplayedNotification>, NotifyError> {
            Err(NotifyError::Unsupported)
        }

        fn focus_host(&self) {}
    }

    #[test]
    fn page_ready_checks_support_before_permission() {
        let status = MemoryStatusDisplay::new();
        let adapter = NotificationAdapter::new(
            InconsistentCapability,
            status.clone(),
            MemoryEnableControl::new(),
            ManualScheduler::new(),
            &NotifierConfig::default(),
        );
        adapter.on_page_ready();
        assert_eq!(status.history(), vec![STATUS_UNSUPPORTED.to_string()]);
    }

    #[test]
    fn inert_capabilities_refuse_everything() {
        let adapter = Rc::new(NotificationAdapter::new(
            UnsupportedNotificationCapability,
            NoopStatusDisplay,
            NoopEnableControl,
            ManualScheduler::new(),
            &NotifierConfig::default(),
        ));

        assert!(!adapter.check_support());
        assert_eq!(
            block_on(adapter.request_permission()),
            Err(NotifyError::Unsupported)
        );
        assert!(!adapter.wire_enable_button());
        assert_eq!(
            adapter.try_send(&NotificationRequest::new("t", "b", DEFAULT_ICON)),
            Err(NotifyError::Unsupported)
        );
        adapter.on_page_ready();
        adapter.notify_from_external_source(&[AlertEvent::new("BTC", "up")]);
    }

    #[test]
    fn denied_permission_drops_whole_batch_silently() {
        let fx = fixture(PermissionState::Denied);
        fx.adapter.notify_from_json(json!([
            {"symbol": "BTC", "message": "a"},
            {"symbol": "ETH", "message": "b"},
        ]));
        assert!(fx.host.displayed().is_empty());
        assert!(fx.status.history().is_empty());
    }
}

//! Notification capability backed by the Web Notifications API.

use std::rc::Rc;

use notify_host::{
    ActivationHandler, DisplayedNotification, NotificationCapability, NotificationRequest,
    NotifyError, PermissionFuture, PermissionState,
};

#[derive(Debug, Clone, Copy, Default)]
/// Browser notification capability. Reports unsupported on non-wasm targets.
pub struct WebNotificationCapability;

impl NotificationCapability for WebNotificationCapability {
    fn is_supported(&self) -> bool {
        imp::is_supported()
    }

    fn permission(&self) -> PermissionState {
        if !imp::is_supported() {
            return PermissionState::Unsupported;
        }
        imp::permission()
    }

    fn request_permission(&self) -> PermissionFuture<'_> {
        Box::pin(async move {
            if !imp::is_supported() {
                return Err(NotifyError::Unsupported);
            }
            imp::request_permission().await
        })
    }

    fn display(
        &self,
        request: &NotificationRequest,
    ) -> Result<Rc<dyn DisplayedNotification>, NotifyError> {
        let notification = imp::display(request)?;
        Ok(Rc::new(notification) as Rc<dyn DisplayedNotification>)
    }

    fn focus_host(&self) {
        imp::focus_host();
    }
}

pub use imp::WebNotification;

#[cfg(target_arch = "wasm32")]
mod imp {
    use std::cell::RefCell;

    use js_sys::{Object, Reflect};
    use leptos::logging::warn;
    use wasm_bindgen::{closure::Closure, JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{NotificationOptions, NotificationPermission};

    use super::*;

    fn js_error(context: &str, err: JsValue) -> NotifyError {
        NotifyError::Platform(format!("{context}: {err:?}"))
    }

    pub fn is_supported() -> bool {
        web_sys::window()
            .map(|window| Reflect::has(&window, &JsValue::from_str("Notification")).unwrap_or(false))
            .unwrap_or(false)
    }

    pub fn permission() -> PermissionState {
        match web_sys::Notification::permission() {
            NotificationPermission::Granted => PermissionState::Granted,
            NotificationPermission::Denied => PermissionState::Denied,
            _ => PermissionState::Default,
        }
    }

    pub async fn request_permission() -> Result<PermissionState, NotifyError> {
        let promise = web_sys::Notification::request_permission()
            .map_err(|err| js_error("notification permission request failed", err))?;
        let answer = JsFuture::from(promise)
            .await
            .map_err(|err| js_error("notification permission prompt rejected", err))?;
        Ok(answer
            .as_string()
            .map(|token| PermissionState::from_token(&token))
            .unwrap_or_default())
    }

    fn options_for(request: &NotificationRequest) -> Result<NotificationOptions, NotifyError> {
        let options = Object::new();
        let fields = [
            ("body", JsValue::from_str(&request.body)),
            ("icon", JsValue::from_str(&request.icon)),
            ("silent", JsValue::from_bool(request.silent)),
        ];
        for (key, value) in fields {
            Reflect::set(&options, &JsValue::from_str(key), &value)
                .map_err(|err| js_error("notification options rejected", err))?;
        }
        Ok(options.unchecked_into())
    }

    pub fn display(request: &NotificationRequest) -> Result<WebNotification, NotifyError> {
        let options = options_for(request)?;
        let inner = web_sys::Notification::new_with_options(&request.title, &options)
            .map_err(|err| js_error("notification dispatch failed", err))?;
        Ok(WebNotification {
            inner,
            click: RefCell::new(None),
        })
    }

    pub fn focus_host() {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.focus() {
                warn!("window focus failed: {err:?}");
            }
        }
    }

    /// A displayed browser notification and its click closure.
    pub struct WebNotification {
        inner: web_sys::Notification,
        click: RefCell<Option<Closure<dyn FnMut()>>>,
    }

    impl DisplayedNotification for WebNotification {
        fn close(&self) {
            // The click closure stays owned until drop so a handler may close its own
            // notification.
            self.inner.set_onclick(None);
            self.inner.close();
        }

        fn on_click(&self, handler: ActivationHandler) {
            let closure = Closure::wrap(handler);
            self.inner
                .set_onclick(Some(closure.as_ref().unchecked_ref()));
            *self.click.borrow_mut() = Some(closure);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::*;

    pub fn is_supported() -> bool {
        false
    }

    pub fn permission() -> PermissionState {
        PermissionState::Unsupported
    }

    pub async fn request_permission() -> Result<PermissionState, NotifyError> {
        Err(NotifyError::Unsupported)
    }

    pub fn display(_request: &NotificationRequest) -> Result<WebNotification, NotifyError> {
        Err(NotifyError::Unsupported)
    }

    pub fn focus_host() {}

    #[derive(Debug, Default)]
    /// Placeholder notification for non-wasm builds; never constructed by the capability.
    pub struct WebNotification;

    impl DisplayedNotification for WebNotification {
        fn close(&self) {}

        fn on_click(&self, _handler: ActivationHandler) {}
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_build_reports_unsupported_and_never_displays() {
        let capability = WebNotificationCapability;
        assert!(!capability.is_supported());
        assert_eq!(capability.permission(), PermissionState::Unsupported);
        assert_eq!(
            block_on(capability.request_permission()),
            Err(NotifyError::Unsupported)
        );
        assert!(capability
            .display(&NotificationRequest::new("t", "b", "assets/btc.png"))
            .is_err());
    }
}

//! Exported page entry points and DOM lifecycle registration.

use std::{cell::RefCell, rc::Rc};

use js_sys::{Promise, Reflect};
use leptos::logging::{log, warn};
use notify_host::{NotifierConfig, NotifyError};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::{build_adapter, WebNotificationAdapter};

thread_local! {
    static ACTIVE_ADAPTER: RefCell<Option<Rc<WebNotificationAdapter>>> =
        const { RefCell::new(None) };
}

fn active_adapter() -> Option<Rc<WebNotificationAdapter>> {
    ACTIVE_ADAPTER.with(|slot| slot.borrow().clone())
}

fn to_js_error(err: NotifyError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Parses an optional JS config object. `undefined` and `null` yield the defaults.
///
/// # Errors
///
/// Returns [`NotifyError::InvalidConfig`] when the object does not describe a valid config.
pub fn config_from_js_value(config: JsValue) -> Result<NotifierConfig, NotifyError> {
    if config.is_undefined() || config.is_null() {
        return Ok(NotifierConfig::default());
    }
    let config: NotifierConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| NotifyError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Installs the notifier on the current page.
///
/// Page init (status text and button wiring) runs after the ready delay once the DOM is
/// parsed, and the alert entry point is published on `window` under `config.entryPoint`.
/// Installing again replaces the active adapter.
///
/// # Errors
///
/// Rejects invalid config, or a page without `window`/`document`.
#[wasm_bindgen(js_name = installNotifications)]
pub fn install_notifications(config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let config = config_from_js_value(config).map_err(to_js_error)?;
    let adapter = build_adapter(&config);

    publish_entry_point(&config.entry_point)?;
    run_when_dom_ready(Rc::clone(&adapter))?;

    ACTIVE_ADAPTER.with(|slot| *slot.borrow_mut() = Some(adapter));
    log!("desktop notifications installed (entry point `{}`)", config.entry_point);
    Ok(())
}

/// Alert producer entry point. Absent, non-array, or malformed input is ignored.
#[wasm_bindgen(js_name = notifyFromDash)]
pub fn notify_from_dash(alerts: JsValue) {
    let Some(adapter) = active_adapter() else {
        log!("alert batch ignored: notifications not installed");
        return;
    };
    match serde_wasm_bindgen::from_value::<serde_json::Value>(alerts) {
        Ok(payload) => adapter.notify_from_json(payload),
        Err(err) => warn!("ignoring undecodable alert batch: {err}"),
    }
}

/// Prompts for permission. Resolves to whether permission was granted; rejects when the
/// browser has no notifications or the notifier is not installed.
#[wasm_bindgen(js_name = requestNotificationPermission)]
pub fn request_notification_permission() -> Promise {
    let adapter = active_adapter();
    future_to_promise(async move {
        let adapter = adapter.ok_or_else(|| JsValue::from_str("notifications not installed"))?;
        adapter
            .request_permission()
            .await
            .map(JsValue::from_bool)
            .map_err(to_js_error)
    })
}

fn publish_entry_point(name: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let entry = Closure::wrap(Box::new(notify_from_dash) as Box<dyn FnMut(JsValue)>);
    Reflect::set(&window, &JsValue::from_str(name), entry.as_ref())?;
    // Published for the lifetime of the page.
    entry.forget();
    Ok(())
}

fn run_when_dom_ready(adapter: Rc<WebNotificationAdapter>) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() != "loading" {
        adapter.schedule_page_init();
        return Ok(());
    }

    let on_ready = Closure::once_into_js(move || adapter.schedule_page_init());
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
}

#[cfg(feature = "autostart")]
#[wasm_bindgen(start)]
/// Installs the notifier with default config when the module loads.
pub fn start() {
    if let Err(err) = install_notifications(JsValue::UNDEFINED) {
        leptos::logging::error!("desktop notifications not installed: {err:?}");
    }
}

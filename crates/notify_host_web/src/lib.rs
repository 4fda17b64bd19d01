//! Browser (`wasm32`) implementations of the [`notify_host`] capability contracts.
//!
//! This crate wires the Web Notifications API, the dashboard's status element and enable
//! button, and `setTimeout`/local-task scheduling into [`notify_host::NotificationAdapter`].
//! On `wasm32` it also exports the page entry points:
//! - `installNotifications(config?)` registers page init and publishes `window.notifyFromDash`
//! - `notifyFromDash(alerts)` is the alert producer's entry point
//! - `requestNotificationPermission()` returns a `Promise<boolean>`
//!
//! Non-wasm builds compile to inert fallbacks: nothing is supported and nothing is displayed.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod dom;
#[cfg(target_arch = "wasm32")]
mod entry;
pub mod host;
pub mod notifications;
pub mod scheduler;

pub use dom::{WebEnableControl, WebStatusDisplay};
#[cfg(target_arch = "wasm32")]
pub use entry::{
    config_from_js_value, install_notifications, notify_from_dash, request_notification_permission,
};
pub use host::{build_adapter, WebNotificationAdapter};
pub use notifications::{WebNotification, WebNotificationCapability};
pub use scheduler::WebTaskScheduler;

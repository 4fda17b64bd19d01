//! Typed contracts and adapter logic for desktop price-alert notifications.
//!
//! This crate is the target-independent half of the notifier. It owns the alert data model,
//! the symbol catalog, fixed status text, configuration, and [`NotificationAdapter`], which is
//! generic over the host capabilities it drives. Concrete browser capabilities live in
//! `notify_host_web`; [`memory`] provides in-memory capabilities for tests and headless hosts.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod adapter;
pub mod alert;
pub mod capability;
pub mod catalog;
pub mod config;
pub mod error;
pub mod memory;
pub mod permission;
pub mod request;
pub mod status;

pub use adapter::NotificationAdapter;
pub use alert::{decode_alert_batch, AlertEvent, AlertKind, CurrencySymbol};
pub use capability::{
    ActivationHandler, DisplayedNotification, EnableControl, LocalTask, NoopEnableControl,
    NoopStatusDisplay, NotificationCapability, PermissionFuture, StatusDisplay, TaskScheduler,
    UnsupportedNotificationCapability,
};
pub use catalog::{AlertCatalog, SymbolProfile, DEFAULT_ICON, FALLBACK_TITLE};
pub use config::{
    NotifierConfig, DEFAULT_AUTO_DISMISS_MS, DEFAULT_ENABLE_BUTTON_ID, DEFAULT_ENTRY_POINT,
    DEFAULT_READY_DELAY_MS, DEFAULT_STATUS_ELEMENT_ID,
};
pub use error::NotifyError;
pub use memory::{
    ManualScheduler, MemoryEnableControl, MemoryNotification, MemoryNotificationHost,
    MemoryStatusDisplay,
};
pub use permission::PermissionState;
pub use request::NotificationRequest;
pub use status::{
    status_message_for, CONFIRMATION_BODY, CONFIRMATION_TITLE, STATUS_DENIED, STATUS_GRANTED,
    STATUS_PROMPT, STATUS_UNSUPPORTED,
};

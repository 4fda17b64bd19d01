//! Host capability contracts consumed by [`crate::NotificationAdapter`], plus inert adapters.

use std::{future::Future, pin::Pin, rc::Rc, time::Duration};

use crate::{NotificationRequest, NotifyError, PermissionState};

/// Object-safe boxed future resolving a permission prompt.
pub type PermissionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<PermissionState, NotifyError>> + 'a>>;

/// Detached local task run by a [`TaskScheduler`].
pub type LocalTask = Pin<Box<dyn Future<Output = ()> + 'static>>;

/// Callback invoked when the user activates a notification or control.
pub type ActivationHandler = Box<dyn FnMut() + 'static>;

/// A notification currently owned by the platform.
pub trait DisplayedNotification {
    /// Dismisses the notification. Closing twice is harmless.
    fn close(&self);

    /// Replaces the click handler.
    fn on_click(&self, handler: ActivationHandler);
}

/// Platform notification capability: support probe, permission, display, and window focus.
pub trait NotificationCapability {
    /// Returns whether the host exposes notifications at all.
    fn is_supported(&self) -> bool;

    /// Reads the current permission, [`PermissionState::Unsupported`] when unsupported.
    fn permission(&self) -> PermissionState;

    /// Prompts the user. Resolves when the user answers or the platform gives up.
    fn request_permission(&self) -> PermissionFuture<'_>;

    /// Constructs and displays a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Platform`] when the platform rejects construction.
    fn display(
        &self,
        request: &NotificationRequest,
    ) -> Result<Rc<dyn DisplayedNotification>, NotifyError>;

    /// Brings the host window to the foreground.
    fn focus_host(&self);
}

/// Host element that shows notifier status text.
pub trait StatusDisplay {
    /// Writes `message`. Returns `false` when the element is absent.
    fn set_status(&self, message: &str) -> bool;
}

/// Host control that lets the user trigger the permission prompt.
pub trait EnableControl {
    /// Binds `handler` to activation and suppresses the default activation behavior.
    /// Returns `false` when the control is absent.
    fn bind_activation(&self, handler: ActivationHandler) -> bool;
}

/// Fire-and-forget timers and local task spawning on the host's single UI thread.
pub trait TaskScheduler {
    /// Runs `task` once after `delay`. There is no cancellation path.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + 'static>);

    /// Drives `task` to completion in the background.
    fn spawn(&self, task: LocalTask);
}

#[derive(Debug, Clone, Copy, Default)]
/// Notification capability for hosts without notifications.
pub struct UnsupportedNotificationCapability;

impl NotificationCapability for UnsupportedNotificationCapability {
    fn is_supported(&self) -> bool {
        false
    }

    fn permission(&self) -> PermissionState {
        PermissionState::Unsupported
    }

    fn request_permission(&self) -> PermissionFuture<'_> {
        Box::pin(async { Err(NotifyError::Unsupported) })
    }

    fn display(
        &self,
        _request: &NotificationRequest,
    ) -> Result<Rc<dyn DisplayedNotification>, NotifyError> {
        Err(NotifyError::Unsupported)
    }

    fn focus_host(&self) {}
}

#[derive(Debug, Clone, Copy, Default)]
/// Status display for pages without a status element.
pub struct NoopStatusDisplay;

impl StatusDisplay for NoopStatusDisplay {
    fn set_status(&self, _message: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Enable control for pages without an enable button.
pub struct NoopEnableControl;

impl EnableControl for NoopEnableControl {
    fn bind_activation(&self, _handler: ActivationHandler) -> bool {
        false
    }
}

//! In-memory host capabilities for headless hosts and tests.
//!
//! Every type here is a cheap `Clone` handle over shared state, so a test can keep one handle
//! for inspection while the adapter owns another.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use futures::{
    channel::oneshot,
    executor::{LocalPool, LocalSpawner},
    task::LocalSpawnExt,
};

use crate::{
    ActivationHandler, DisplayedNotification, EnableControl, LocalTask, NotificationCapability,
    NotificationRequest, NotifyError, PermissionFuture, PermissionState, StatusDisplay,
    TaskScheduler,
};

/// A notification recorded by [`MemoryNotificationHost`].
pub struct MemoryNotification {
    request: NotificationRequest,
    closed: Cell<bool>,
    click: RefCell<Option<ActivationHandler>>,
}

impl MemoryNotification {
    /// Request this notification was built from.
    pub fn request(&self) -> &NotificationRequest {
        &self.request
    }

    /// Whether the notification has been dismissed.
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Whether a click handler is registered.
    pub fn has_click_handler(&self) -> bool {
        self.click.borrow().is_some()
    }

    /// Simulates the user clicking the notification.
    pub fn click(&self) {
        let handler = self.click.borrow_mut().take();
        if let Some(mut handler) = handler {
            handler();
            let mut slot = self.click.borrow_mut();
            if slot.is_none() {
                *slot = Some(handler);
            }
        }
    }
}

impl std::fmt::Debug for MemoryNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryNotification")
            .field("request", &self.request)
            .field("closed", &self.closed.get())
            .finish_non_exhaustive()
    }
}

impl DisplayedNotification for MemoryNotification {
    fn close(&self) {
        self.closed.set(true);
    }

    fn on_click(&self, handler: ActivationHandler) {
        *self.click.borrow_mut() = Some(handler);
    }
}

#[derive(Default)]
struct HostState {
    supported: bool,
    permission: PermissionState,
    prompt_answer: Option<PermissionState>,
    pending_prompts: Vec<oneshot::Sender<PermissionState>>,
    prompt_count: usize,
    rejected_titles: Vec<String>,
    displayed: Vec<Rc<MemoryNotification>>,
    focus_count: usize,
}

#[derive(Clone)]
/// Scriptable notification capability that records every display.
pub struct MemoryNotificationHost {
    inner: Rc<RefCell<HostState>>,
}

impl MemoryNotificationHost {
    /// Host supporting notifications with the given current permission.
    pub fn new(permission: PermissionState) -> Self {
        let supported = permission != PermissionState::Unsupported;
        Self {
            inner: Rc::new(RefCell::new(HostState {
                supported,
                permission,
                ..HostState::default()
            })),
        }
    }

    /// Host without notification support.
    pub fn unsupported() -> Self {
        Self::new(PermissionState::Unsupported)
    }

    /// Makes every future prompt resolve immediately with `answer`.
    pub fn answer_prompts_with(&self, answer: PermissionState) {
        self.inner.borrow_mut().prompt_answer = Some(answer);
    }

    /// Resolves all pending prompts with `answer` and records it as the current permission.
    pub fn respond_to_prompts(&self, answer: PermissionState) {
        let senders = {
            let mut state = self.inner.borrow_mut();
            state.permission = answer;
            std::mem::take(&mut state.pending_prompts)
        };
        for sender in senders {
            let _ = sender.send(answer);
        }
    }

    /// Drops all pending prompts unanswered, as a platform cancelling the prompt would.
    pub fn cancel_prompts(&self) {
        self.inner.borrow_mut().pending_prompts.clear();
    }

    /// Overrides the current permission without prompting.
    pub fn set_permission(&self, permission: PermissionState) {
        self.inner.borrow_mut().permission = permission;
    }

    /// Makes construction fail for notifications titled `title`.
    pub fn reject_title(&self, title: impl Into<String>) {
        self.inner.borrow_mut().rejected_titles.push(title.into());
    }

    /// Number of prompts shown so far.
    pub fn prompt_count(&self) -> usize {
        self.inner.borrow().prompt_count
    }

    /// Number of prompts still awaiting an answer.
    pub fn pending_prompt_count(&self) -> usize {
        self.inner.borrow().pending_prompts.len()
    }

    /// Notifications displayed so far, in display order.
    pub fn displayed(&self) -> Vec<Rc<MemoryNotification>> {
        self.inner.borrow().displayed.clone()
    }

    /// Requests of notifications displayed so far, in display order.
    pub fn displayed_requests(&self) -> Vec<NotificationRequest> {
        self.inner
            .borrow()
            .displayed
            .iter()
            .map(|notification| notification.request.clone())
            .collect()
    }

    /// Number of times the host window was focused.
    pub fn focus_count(&self) -> usize {
        self.inner.borrow().focus_count
    }
}

impl NotificationCapability for MemoryNotificationHost {
    fn is_supported(&self) -> bool {
        self.inner.borrow().supported
    }

    fn permission(&self) -> PermissionState {
        let state = self.inner.borrow();
        if state.supported {
            state.permission
        } else {
            PermissionState::Unsupported
        }
    }

    fn request_permission(&self) -> PermissionFuture<'_> {
        let mut state = self.inner.borrow_mut();
        state.prompt_count += 1;
        if let Some(answer) = state.prompt_answer {
            state.permission = answer;
            return Box::pin(async move { Ok(answer) });
        }
        let (sender, receiver) = oneshot::channel();
        state.pending_prompts.push(sender);
        Box::pin(async move {
            receiver
                .await
                .map_err(|_| NotifyError::Platform("permission prompt was cancelled".to_string()))
        })
    }

    fn display(
        &self,
        request: &NotificationRequest,
    ) -> Result<Rc<dyn DisplayedNotification>, NotifyError> {
        let mut state = self.inner.borrow_mut();
        if state.rejected_titles.contains(&request.title) {
            return Err(NotifyError::Platform(format!(
                "notification `{}` rejected",
                request.title
            )));
        }
        let notification = Rc::new(MemoryNotification {
            request: request.clone(),
            closed: Cell::new(false),
            click: RefCell::new(None),
        });
        state.displayed.push(Rc::clone(&notification));
        Ok(notification as Rc<dyn DisplayedNotification>)
    }

    fn focus_host(&self) {
        self.inner.borrow_mut().focus_count += 1;
    }
}

#[derive(Debug, Clone)]
/// Status element recording every write.
pub struct MemoryStatusDisplay {
    present: bool,
    history: Rc<RefCell<Vec<String>>>,
}

impl MemoryStatusDisplay {
    /// A present status element.
    pub fn new() -> Self {
        Self {
            present: true,
            history: Rc::default(),
        }
    }

    /// A page without the status element.
    pub fn absent() -> Self {
        Self {
            present: false,
            history: Rc::default(),
        }
    }

    /// Last written message.
    pub fn current(&self) -> Option<String> {
        self.history.borrow().last().cloned()
    }

    /// All written messages, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl Default for MemoryStatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusDisplay for MemoryStatusDisplay {
    fn set_status(&self, message: &str) -> bool {
        if self.present {
            self.history.borrow_mut().push(message.to_string());
        }
        self.present
    }
}

#[derive(Clone)]
/// Enable button whose activation tests trigger by hand.
pub struct MemoryEnableControl {
    present: bool,
    handler: Rc<RefCell<Option<ActivationHandler>>>,
}

impl MemoryEnableControl {
    /// A present button.
    pub fn new() -> Self {
        Self {
            present: true,
            handler: Rc::default(),
        }
    }

    /// A page without the button.
    pub fn absent() -> Self {
        Self {
            present: false,
            handler: Rc::default(),
        }
    }

    /// Whether a handler is bound.
    pub fn is_bound(&self) -> bool {
        self.handler.borrow().is_some()
    }

    /// Simulates a button press. Returns `true` when a bound handler consumed the press.
    pub fn activate(&self) -> bool {
        let handler = self.handler.borrow_mut().take();
        let Some(mut handler) = handler else {
            return false;
        };
        handler();
        let mut slot = self.handler.borrow_mut();
        if slot.is_none() {
            *slot = Some(handler);
        }
        true
    }
}

impl Default for MemoryEnableControl {
    fn default() -> Self {
        Self::new()
    }
}

impl EnableControl for MemoryEnableControl {
    fn bind_activation(&self, handler: ActivationHandler) -> bool {
        if self.present {
            *self.handler.borrow_mut() = Some(handler);
        }
        self.present
    }
}

struct TimerEntry {
    due: Duration,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

struct SchedulerState {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    timers: RefCell<Vec<TimerEntry>>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
}

#[derive(Clone)]
/// Scheduler driven by a virtual clock and a local executor.
pub struct ManualScheduler {
    inner: Rc<SchedulerState>,
}

impl ManualScheduler {
    /// Scheduler at virtual time zero with nothing queued.
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            inner: Rc::new(SchedulerState {
                now: Cell::new(Duration::ZERO),
                next_seq: Cell::new(0),
                timers: RefCell::new(Vec::new()),
                pool: RefCell::new(pool),
                spawner,
            }),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.now.get()
    }

    /// Number of timers not yet fired.
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Polls spawned tasks until none can make progress.
    pub fn run_until_stalled(&self) {
        self.inner.pool.borrow_mut().run_until_stalled();
    }

    /// Moves the clock forward by `by`, firing due timers in order. Returns how many fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.inner.now.get() + by;
        let mut fired = 0;
        self.run_until_stalled();
        while let Some(entry) = self.take_next_due(target) {
            self.inner.now.set(entry.due);
            (entry.task)();
            fired += 1;
            self.run_until_stalled();
        }
        self.inner.now.set(target);
        fired
    }

    fn take_next_due(&self, target: Duration) -> Option<TimerEntry> {
        let mut timers = self.inner.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= target)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(index, _)| index)?;
        Some(timers.remove(index))
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + 'static>) {
        let seq = self.inner.next_seq.get();
        self.inner.next_seq.set(seq + 1);
        self.inner.timers.borrow_mut().push(TimerEntry {
            due: self.inner.now.get() + delay,
            seq,
            task,
        });
    }

    fn spawn(&self, task: LocalTask) {
        if let Err(err) = self.inner.spawner.spawn_local(task) {
            leptos::logging::error!("local task spawn failed: {err}");
        }
    }
}

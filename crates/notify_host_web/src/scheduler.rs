//! `setTimeout` timers and `spawn_local` tasks on the page's UI thread.

use std::time::Duration;

use notify_host::{LocalTask, TaskScheduler};

#[derive(Debug, Clone, Copy, Default)]
/// Browser task scheduler. Timers and tasks are dropped on non-wasm targets.
pub struct WebTaskScheduler;

impl TaskScheduler for WebTaskScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + 'static>) {
        #[cfg(target_arch = "wasm32")]
        {
            use leptos::logging::error;
            use wasm_bindgen::{closure::Closure, JsCast};

            let Some(window) = web_sys::window() else {
                error!("timer not scheduled: no window");
                return;
            };
            let timeout_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
            let callback = Closure::once_into_js(task);
            if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout_ms,
            ) {
                error!("timer not scheduled: {err:?}");
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (delay, task);
        }
    }

    fn spawn(&self, task: LocalTask) {
        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(task);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = task;
        }
    }
}

//! Browser capability seam shared by every page component.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components never reach for `window`/`document` themselves. They receive a
//! `Platform` for storage, media queries, navigation, and timers, plus a small
//! surface trait for the elements they own. `browser::BrowserPlatform` is the
//! real implementation; tests drive a virtual-clock mock instead.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A `!Send` task for the single-threaded browser executor.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Page-wide browser capabilities.
pub trait Platform {
    /// Read a value from persistent key-value storage.
    fn storage_get(&self, key: &str) -> Option<String>;

    /// Write a value to persistent key-value storage. Failures are ignored.
    fn storage_set(&self, key: &str, value: &str);

    /// Evaluate a CSS media query such as `(prefers-color-scheme: dark)`.
    fn media_matches(&self, query: &str) -> bool;

    /// Navigate the page to `uri` (used for the `mailto:` handoff).
    fn navigate(&self, uri: &str);

    /// Run `callback` once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>);

    /// Run a future to completion on the page's event loop.
    fn spawn(&self, task: LocalTask);
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    struct PendingTimer {
        due_ms: u64,
        seq: u64,
        callback: Box<dyn FnOnce()>,
    }

    /// In-memory platform with a manually advanced clock.
    #[derive(Default)]
    pub struct MockPlatform {
        pub storage: RefCell<HashMap<String, String>>,
        pub prefers_dark: Cell<bool>,
        pub navigations: RefCell<Vec<String>>,
        now_ms: Cell<u64>,
        next_seq: Cell<u64>,
        timers: RefCell<Vec<PendingTimer>>,
        tasks: RefCell<Vec<LocalTask>>,
    }

    impl MockPlatform {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Current virtual time in milliseconds.
        pub fn now_ms(&self) -> u64 {
            self.now_ms.get()
        }

        /// Number of timers not yet fired.
        pub fn pending_timers(&self) -> usize {
            self.timers.borrow().len()
        }

        /// Number of spawned tasks waiting for [`MockPlatform::run_tasks`].
        pub fn pending_tasks(&self) -> usize {
            self.tasks.borrow().len()
        }

        /// Drive every spawned task to completion, in spawn order.
        pub fn run_tasks(&self) {
            loop {
                let next = {
                    let mut tasks = self.tasks.borrow_mut();
                    if tasks.is_empty() { None } else { Some(tasks.remove(0)) }
                };
                let Some(task) = next else { break };
                futures::executor::block_on(task);
            }
        }

        /// Move the clock forward, firing due timers in schedule order.
        ///
        /// Timers scheduled by a firing callback are honored if they fall due
        /// inside the same window.
        pub fn advance(&self, ms: u64) {
            let target = self.now_ms.get() + ms;
            loop {
                let next = {
                    let mut timers = self.timers.borrow_mut();
                    let idx = timers
                        .iter()
                        .enumerate()
                        .filter(|(_, t)| t.due_ms <= target)
                        .min_by_key(|(_, t)| (t.due_ms, t.seq))
                        .map(|(i, _)| i);
                    idx.map(|i| timers.remove(i))
                };
                let Some(timer) = next else { break };
                self.now_ms.set(timer.due_ms);
                (timer.callback)();
            }
            self.now_ms.set(target);
        }
    }

    impl Platform for MockPlatform {
        fn storage_get(&self, key: &str) -> Option<String> {
            self.storage.borrow().get(key).cloned()
        }

        fn storage_set(&self, key: &str, value: &str) {
            self.storage
                .borrow_mut()
                .insert(key.to_owned(), value.to_owned());
        }

        fn media_matches(&self, query: &str) -> bool {
            query == "(prefers-color-scheme: dark)" && self.prefers_dark.get()
        }

        fn navigate(&self, uri: &str) {
            self.navigations.borrow_mut().push(uri.to_owned());
        }

        fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
            let seq = self.next_seq.get();
            self.next_seq.set(seq + 1);
            let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            self.timers.borrow_mut().push(PendingTimer {
                due_ms: self.now_ms.get().saturating_add(delay_ms),
                seq,
                callback,
            });
        }

        fn spawn(&self, task: LocalTask) {
            self.tasks.borrow_mut().push(task);
        }
    }
}

//! `Platform` over `window`: `localStorage`, `matchMedia`, `location`, and
//! `gloo-timers`.

use std::time::Duration;

use gloo_timers::callback::Timeout;

use crate::config::MAX_TIMER_MS;
use crate::platform::{LocalTask, Platform};

pub struct BrowserPlatform {
    window: web_sys::Window,
}

impl BrowserPlatform {
    #[must_use]
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        self.window.local_storage().ok().flatten()
    }
}

impl Platform for BrowserPlatform {
    fn storage_get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn storage_set(&self, key: &str, value: &str) {
        // Private browsing modes can reject writes.
        if let Some(storage) = self.storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn media_matches(&self, query: &str) -> bool {
        self.window
            .match_media(query)
            .ok()
            .flatten()
            .is_some_and(|mq| mq.matches())
    }

    fn navigate(&self, uri: &str) {
        let _ = self.window.location().set_href(uri);
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis().min(u128::from(MAX_TIMER_MS))).unwrap_or(u32::MAX);
        Timeout::new(millis, callback).forget();
    }

    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

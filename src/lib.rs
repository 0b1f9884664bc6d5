//! Client-side enhancements for a static portfolio page.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page is plain HTML; this crate layers behavior on top of it: theming,
//! navigation highlighting, entrance animations with lazy images, link
//! prefetch, keyboard shortcuts, error logging, and the contact form with its
//! network delivery and `mailto:` fallback.
//!
//! Every component is a plain struct with `initialize`/`teardown` that talks
//! to the page through the [`platform::Platform`] capability and a small
//! per-component surface trait. That keeps all logic testable natively; the
//! `hydrate` feature adds the `web-sys` implementations in `browser` and the
//! WASM entry point.

pub mod a11y;
pub mod config;
pub mod contact;
pub mod errors;
pub mod nav;
pub mod platform;
pub mod prefetch;
pub mod reveal;
pub mod theme;

#[cfg(feature = "hydrate")]
pub mod browser;

/// WASM entry point: route logs to the console and enhance the page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    let _ = console_log::init_with_level(log::Level::Info);
    browser::boot();
}

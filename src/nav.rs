//! Scroll-driven navigation highlighting and in-page anchor scrolling.
//!
//! DESIGN
//! ======
//! Section geometry is re-measured on every scroll so late-loading images or
//! font swaps never leave stale offsets. The surface is only written when the
//! active section or the scrolled flag actually changes.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::NavConfig;

/// Document-relative geometry of one page section.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// The section the viewport is in: the last one whose `[top - offset,
/// top - offset + height)` range contains `scroll_y`.
#[must_use]
pub fn active_section(sections: &[SectionBounds], scroll_y: f64, offset: f64) -> Option<&str> {
    sections
        .iter()
        .rev()
        .find(|s| {
            let start = s.top - offset;
            scroll_y >= start && scroll_y < start + s.height
        })
        .map(|s| s.id.as_str())
}

pub trait NavSurface {
    fn sections(&self) -> Vec<SectionBounds>;
    /// Mark the link targeting `#id` active and clear the rest.
    fn set_active_link(&self, id: Option<&str>);
    fn set_scrolled(&self, scrolled: bool);
    fn scroll_to(&self, y: f64);
    fn bind(&self, handlers: NavHandlers);
    fn unbind(&self);
}

#[derive(Clone)]
pub struct NavHandlers {
    pub on_scroll: Rc<dyn Fn(f64)>,
    /// Called with a nav link's `href`; returns `true` when it scrolled.
    pub on_anchor_click: Rc<dyn Fn(&str) -> bool>,
}

#[derive(Clone)]
pub struct NavHighlighter {
    inner: Rc<NavInner>,
}

struct NavInner {
    config: NavConfig,
    surface: Rc<dyn NavSurface>,
    active: RefCell<Option<String>>,
    scrolled: Cell<Option<bool>>,
}

impl NavHighlighter {
    #[must_use]
    pub fn new(config: NavConfig, surface: Rc<dyn NavSurface>) -> Self {
        Self {
            inner: Rc::new(NavInner { config, surface, active: RefCell::new(None), scrolled: Cell::new(None) }),
        }
    }

    /// Bind listeners and sync state for the initial scroll position.
    pub fn initialize(&self, scroll_y: f64) {
        let weak = Rc::downgrade(&self.inner);
        let on_scroll = {
            let weak = weak.clone();
            Rc::new(move |y: f64| {
                if let Some(inner) = weak.upgrade() {
                    Self { inner }.on_scroll(y);
                }
            })
        };
        let on_anchor_click = Rc::new(move |href: &str| {
            weak.upgrade()
                .is_some_and(|inner| Self { inner }.scroll_to_anchor(href))
        });
        self.inner
            .surface
            .bind(NavHandlers { on_scroll, on_anchor_click });
        self.on_scroll(scroll_y);
    }

    pub fn teardown(&self) {
        self.inner.surface.unbind();
    }

    #[must_use]
    pub fn active(&self) -> Option<String> {
        self.inner.active.borrow().clone()
    }

    pub fn on_scroll(&self, scroll_y: f64) {
        let sections = self.inner.surface.sections();
        let current = active_section(&sections, scroll_y, self.inner.config.offset_px).map(str::to_owned);
        if *self.inner.active.borrow() != current {
            self.inner.surface.set_active_link(current.as_deref());
            *self.inner.active.borrow_mut() = current;
        }

        let scrolled = scroll_y > self.inner.config.scrolled_threshold_px;
        if self.inner.scrolled.get() != Some(scrolled) {
            self.inner.scrolled.set(Some(scrolled));
            self.inner.surface.set_scrolled(scrolled);
        }
    }

    /// Scroll destination for an in-page `#id` link to a known section.
    #[must_use]
    pub fn anchor_target(&self, href: &str) -> Option<f64> {
        let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
        self.inner
            .surface
            .sections()
            .into_iter()
            .find(|s| s.id == id)
            .map(|s| (s.top - self.inner.config.offset_px).max(0.0))
    }

    /// Smooth-scroll to an anchor. Returns `false` for links it does not own.
    pub fn scroll_to_anchor(&self, href: &str) -> bool {
        let Some(y) = self.anchor_target(href) else {
            return false;
        };
        self.inner.surface.scroll_to(y);
        true
    }
}

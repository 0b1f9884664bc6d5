//! Hover/focus-triggered `<link rel="prefetch">` hints for same-origin pages.

#[cfg(test)]
#[path = "prefetch_test.rs"]
mod prefetch_test;

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

const SKIPPED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Drop the `#fragment`, which never changes what gets fetched.
fn strip_fragment(href: &str) -> &str {
    href.split_once('#').map_or(href, |(base, _)| base)
}

/// Whether `href` names a same-origin document worth prefetching.
///
/// `origin` is `scheme://host[:port]` without a trailing slash.
#[must_use]
pub fn should_prefetch(href: &str, origin: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("//") {
        return false;
    }
    let lower = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return false;
    }
    if lower.contains("://") {
        let Some(rest) = href.strip_prefix(origin) else {
            return false;
        };
        return rest.is_empty() || rest.starts_with('/') || rest.starts_with('?');
    }
    true
}

pub trait PrefetchSurface {
    fn insert_prefetch(&self, href: &str);
    /// `on_intent` receives the `href` of a hovered or focused link.
    fn bind(&self, on_intent: Rc<dyn Fn(&str)>);
    fn unbind(&self);
}

#[derive(Clone)]
pub struct PrefetchSet {
    inner: Rc<PrefetchInner>,
}

struct PrefetchInner {
    origin: String,
    surface: Rc<dyn PrefetchSurface>,
    seen: RefCell<HashSet<String>>,
}

impl PrefetchSet {
    #[must_use]
    pub fn new(origin: impl Into<String>, surface: Rc<dyn PrefetchSurface>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_owned();
        Self { inner: Rc::new(PrefetchInner { origin, surface, seen: RefCell::new(HashSet::new()) }) }
    }

    pub fn initialize(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.surface.bind(Rc::new(move |href: &str| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.on_intent(href);
            }
        }));
    }

    pub fn teardown(&self) {
        self.inner.surface.unbind();
    }

    /// Insert a prefetch hint the first time a qualifying link shows intent.
    pub fn on_intent(&self, href: &str) -> bool {
        if !should_prefetch(href, &self.inner.origin) {
            return false;
        }
        let target = strip_fragment(href.trim());
        if !self.inner.seen.borrow_mut().insert(target.to_owned()) {
            return false;
        }
        self.inner.surface.insert_prefetch(target);
        true
    }
}

//! Entrance animations and lazy image loading, driven by intersection events.
//!
//! Each target fires at most once: animated elements gain `animate-in`, lazy
//! images get their `data-src` promoted to `src`, and both are unobserved.
//! Without intersection support every target is revealed immediately.

#[cfg(test)]
#[path = "reveal_test.rs"]
mod reveal_test;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub const ANIMATE_IN_CLASS: &str = "animate-in";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealKind {
    Animate,
    LazyImage { src: String },
}

/// One observed element, addressed by its index in the surface's target list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealTarget {
    pub index: usize,
    pub kind: RevealKind,
}

pub trait RevealSurface {
    fn targets(&self) -> Vec<RevealTarget>;
    /// Start observing; `on_enter` receives target indices as they intersect.
    /// Returns `false` when intersection observation is unavailable.
    fn observe(&self, indices: &[usize], on_enter: Rc<dyn Fn(usize)>) -> bool;
    fn unobserve(&self, index: usize);
    fn add_class(&self, index: usize, class: &str);
    /// Set `src`, drop `data-src`, and remove the `lazy` class.
    fn load_image(&self, index: usize, src: &str);
    fn disconnect(&self);
}

#[derive(Clone)]
pub struct RevealTracker {
    inner: Rc<RevealInner>,
}

struct RevealInner {
    surface: Rc<dyn RevealSurface>,
    targets: RefCell<HashMap<usize, RevealKind>>,
    revealed: RefCell<HashSet<usize>>,
}

impl RevealTracker {
    #[must_use]
    pub fn new(surface: Rc<dyn RevealSurface>) -> Self {
        Self {
            inner: Rc::new(RevealInner {
                surface,
                targets: RefCell::new(HashMap::new()),
                revealed: RefCell::new(HashSet::new()),
            }),
        }
    }

    pub fn initialize(&self) {
        let targets = self.inner.surface.targets();
        let mut indices = targets.iter().map(|t| t.index).collect::<Vec<_>>();
        indices.sort_unstable();
        *self.inner.targets.borrow_mut() = targets
            .into_iter()
            .map(|t| (t.index, t.kind))
            .collect();

        let weak = Rc::downgrade(&self.inner);
        let on_enter: Rc<dyn Fn(usize)> = Rc::new(move |index| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.reveal(index);
            }
        });
        if !self.inner.surface.observe(&indices, on_enter) {
            log::debug!("intersection observation unavailable; revealing {} targets", indices.len());
            for index in indices {
                self.reveal(index);
            }
        }
    }

    pub fn teardown(&self) {
        self.inner.surface.disconnect();
    }

    /// Reveal one target. Returns `false` if unknown or already revealed.
    pub fn reveal(&self, index: usize) -> bool {
        let Some(kind) = self.inner.targets.borrow().get(&index).cloned() else {
            return false;
        };
        if !self.inner.revealed.borrow_mut().insert(index) {
            return false;
        }
        let surface = &self.inner.surface;
        match kind {
            RevealKind::Animate => surface.add_class(index, ANIMATE_IN_CLASS),
            RevealKind::LazyImage { src } => surface.load_image(index, &src),
        }
        surface.unobserve(index);
        true
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.inner.revealed.borrow().len()
    }
}

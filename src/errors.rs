//! Page-level error reporting.
//!
//! ERROR HANDLING
//! ==============
//! Uncaught script errors and unhandled promise rejections are logged at
//! `error` level and otherwise swallowed. Nothing is surfaced to the visitor.
//! Panics reach the console through `console_error_panic_hook` under `hydrate`.

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Something the page failed to handle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnhandledError {
    #[error("{message} at {file}:{line}:{column}")]
    Script { message: String, file: String, line: u32, column: u32 },
    #[error("unhandled rejection: {reason}")]
    Rejection { reason: String },
}

pub trait ErrorSurface {
    fn bind(&self, on_error: Rc<dyn Fn(UnhandledError)>);
    fn unbind(&self);
}

#[derive(Clone)]
pub struct ErrorReporter {
    inner: Rc<ReporterInner>,
}

struct ReporterInner {
    surface: Rc<dyn ErrorSurface>,
    reported: Cell<usize>,
    last: RefCell<Option<String>>,
}

impl ErrorReporter {
    #[must_use]
    pub fn new(surface: Rc<dyn ErrorSurface>) -> Self {
        Self {
            inner: Rc::new(ReporterInner { surface, reported: Cell::new(0), last: RefCell::new(None) }),
        }
    }

    pub fn install(&self) {
        #[cfg(feature = "hydrate")]
        console_error_panic_hook::set_once();

        let weak = Rc::downgrade(&self.inner);
        self.inner.surface.bind(Rc::new(move |err| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.report(&err);
            }
        }));
    }

    pub fn teardown(&self) {
        self.inner.surface.unbind();
    }

    pub fn report(&self, err: &UnhandledError) {
        let line = err.to_string();
        log::error!("{line}");
        self.inner.reported.set(self.inner.reported.get() + 1);
        *self.inner.last.borrow_mut() = Some(line);
    }

    #[must_use]
    pub fn reported(&self) -> usize {
        self.inner.reported.get()
    }

    #[must_use]
    pub fn last_reported(&self) -> Option<String> {
        self.inner.last.borrow().clone()
    }
}

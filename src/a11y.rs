//! Keyboard shortcuts, keyboard-focus styling, and screen-reader announcements.
//!
//! SYSTEM CONTEXT
//! ==============
//! Shortcuts are resolved from a plain [`KeyPress`] so the mapping is testable
//! without DOM events; `Accessibility` performs the resulting actions through
//! [`A11ySurface`]. `Announcer` is shared with other components (theme toggle).

#[cfg(test)]
#[path = "a11y_test.rs"]
mod a11y_test;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::platform::Platform;
use crate::theme::ThemeManager;

/// Delay between clearing and filling the live region so repeated identical
/// messages are re-read.
pub const ANNOUNCE_DELAY: Duration = Duration::from_millis(100);
pub const KEYBOARD_NAV_CLASS: &str = "keyboard-nav";

#[derive(Clone, Copy)]
struct ShortcutRow {
    action: ShortcutAction,
    code: &'static str,
    keys: &'static str,
}

/// Alt-modified shortcuts. `code` is the physical key so layouts that remap
/// Alt combinations (macOS Option) still match.
const SHORTCUTS: &[ShortcutRow] = &[
    ShortcutRow { action: ShortcutAction::ToggleTheme, code: "KeyT", keys: "Alt + T" },
    ShortcutRow { action: ShortcutAction::FocusContact, code: "KeyC", keys: "Alt + C" },
    ShortcutRow { action: ShortcutAction::ScrollTop, code: "KeyH", keys: "Alt + H" },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutAction {
    ToggleTheme,
    FocusContact,
    ScrollTop,
    BlurActive,
}

impl ShortcutAction {
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::ToggleTheme => "Toggle dark mode",
            Self::FocusContact => "Jump to contact form",
            Self::ScrollTop => "Back to top",
            Self::BlurActive => "Leave current field",
        }
    }
}

/// A keydown reduced to what shortcut matching needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub code: String,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    /// Focus is inside an input, textarea, select, or contenteditable.
    pub in_editable: bool,
}

/// Map a key press onto a shortcut action.
#[must_use]
pub fn resolve_shortcut(press: &KeyPress) -> Option<ShortcutAction> {
    if press.key == "Escape" {
        return Some(ShortcutAction::BlurActive);
    }
    if !press.alt || press.ctrl || press.meta || press.in_editable {
        return None;
    }
    SHORTCUTS
        .iter()
        .find(|row| row.code == press.code)
        .map(|row| row.action)
}

/// `(keys, description)` rows for a help listing.
#[must_use]
pub fn shortcut_help() -> Vec<(&'static str, &'static str)> {
    SHORTCUTS
        .iter()
        .map(|row| (row.keys, row.action.description()))
        .chain(std::iter::once(("Esc", ShortcutAction::BlurActive.description())))
        .collect()
}

// =============================================================================
// ANNOUNCER
// =============================================================================

/// A polite `aria-live` region.
pub trait LiveRegion {
    fn set_text(&self, text: &str);
}

/// Writes messages into a live region for assistive technology.
#[derive(Clone)]
pub struct Announcer {
    region: Rc<dyn LiveRegion>,
    platform: Rc<dyn Platform>,
}

impl Announcer {
    #[must_use]
    pub fn new(region: Rc<dyn LiveRegion>, platform: Rc<dyn Platform>) -> Self {
        Self { region, platform }
    }

    pub fn announce(&self, text: &str) {
        self.region.set_text("");
        let region = Rc::clone(&self.region);
        let text = text.to_owned();
        self.platform
            .set_timeout(ANNOUNCE_DELAY, Box::new(move || region.set_text(&text)));
    }
}

// =============================================================================
// ACCESSIBILITY
// =============================================================================

/// Page-level element access for shortcut actions.
pub trait A11ySurface {
    /// Focus the contact form's first field. Returns `false` if there is none.
    fn focus_contact(&self) -> bool;
    fn scroll_to_top(&self);
    fn blur_active(&self);
    fn set_keyboard_nav(&self, enabled: bool);
    fn bind(&self, handlers: A11yHandlers);
    fn unbind(&self);
}

#[derive(Clone)]
pub struct A11yHandlers {
    /// Returns `true` when the press was consumed (caller prevents default).
    pub on_key: Rc<dyn Fn(&KeyPress) -> bool>,
    pub on_pointer_down: Rc<dyn Fn()>,
}

/// Global shortcut handling.
#[derive(Clone)]
pub struct Accessibility {
    inner: Rc<A11yInner>,
}

struct A11yInner {
    surface: Rc<dyn A11ySurface>,
    theme: RefCell<Option<ThemeManager>>,
    announcer: Option<Announcer>,
}

impl Accessibility {
    #[must_use]
    pub fn new(surface: Rc<dyn A11ySurface>, theme: Option<ThemeManager>, announcer: Option<Announcer>) -> Self {
        Self { inner: Rc::new(A11yInner { surface, theme: RefCell::new(theme), announcer }) }
    }

    pub fn initialize(&self) {
        let weak = Rc::downgrade(&self.inner);
        let on_key = {
            let weak = weak.clone();
            Rc::new(move |press: &KeyPress| {
                weak.upgrade()
                    .is_some_and(|inner| Self { inner }.handle_key(press))
            })
        };
        let on_pointer_down = Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.surface.set_keyboard_nav(false);
            }
        });
        self.inner
            .surface
            .bind(A11yHandlers { on_key, on_pointer_down });
    }

    pub fn teardown(&self) {
        self.inner.surface.unbind();
        self.inner.theme.borrow_mut().take();
    }

    /// Apply a key press. Returns `true` when a shortcut consumed it.
    pub fn handle_key(&self, press: &KeyPress) -> bool {
        if press.key == "Tab" {
            self.inner.surface.set_keyboard_nav(true);
            return false;
        }
        let Some(action) = resolve_shortcut(press) else {
            return false;
        };
        self.perform(action)
    }

    /// Run a shortcut action. Returns `false` when it had nothing to act on.
    pub fn perform(&self, action: ShortcutAction) -> bool {
        let surface = &self.inner.surface;
        match action {
            ShortcutAction::ToggleTheme => {
                let theme = self.inner.theme.borrow().clone();
                theme.is_some_and(|theme| {
                    theme.toggle();
                    true
                })
            }
            ShortcutAction::FocusContact => {
                let focused = surface.focus_contact();
                if focused {
                    self.announce("Contact form focused");
                }
                focused
            }
            ShortcutAction::ScrollTop => {
                surface.scroll_to_top();
                self.announce("Scrolled to top");
                true
            }
            ShortcutAction::BlurActive => {
                surface.blur_active();
                false
            }
        }
    }

    fn announce(&self, text: &str) {
        if let Some(announcer) = &self.inner.announcer {
            announcer.announce(text);
        }
    }
}

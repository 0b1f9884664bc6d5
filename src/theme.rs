//! Light/dark theme initialization and toggle.
//!
//! Reads the stored preference (key `"theme"` by default) and falls back to the
//! system `prefers-color-scheme`. The chosen theme is applied as a
//! `data-theme` attribute on the root element. Toggling writes the preference
//! back to storage; system changes are followed only while nothing is stored.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort: storage failures are swallowed by the platform
//! and the theme still applies for the current page view.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::a11y::Announcer;
use crate::config::ThemeConfig;
use crate::platform::Platform;

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Value stored in storage and written to `data-theme`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Accessible label for the toggle: it names the theme a click switches to.
    #[must_use]
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Switch to dark mode",
            Self::Dark => "Switch to light mode",
        }
    }

    #[must_use]
    pub fn enabled_message(self) -> &'static str {
        match self {
            Self::Light => "Light mode enabled",
            Self::Dark => "Dark mode enabled",
        }
    }
}

/// Stored preference wins; otherwise follow the system; otherwise light.
/// Unrecognized stored values are ignored.
#[must_use]
pub fn resolve_theme(stored: Option<&str>, prefers_dark: bool) -> Theme {
    match stored.and_then(Theme::parse) {
        Some(theme) => theme,
        None if prefers_dark => Theme::Dark,
        None => Theme::Light,
    }
}

/// Root element and toggle control.
pub trait ThemeSurface {
    fn apply_theme(&self, theme: Theme);
    fn set_toggle_label(&self, label: &str);
    fn bind(&self, handlers: ThemeHandlers);
    fn unbind(&self);
}

#[derive(Clone)]
pub struct ThemeHandlers {
    pub on_toggle: Rc<dyn Fn()>,
    /// Called with the new `prefers-color-scheme: dark` match state.
    pub on_system_change: Rc<dyn Fn(bool)>,
}

#[derive(Clone)]
pub struct ThemeManager {
    inner: Rc<ThemeInner>,
}

struct ThemeInner {
    config: ThemeConfig,
    platform: Rc<dyn Platform>,
    surface: Rc<dyn ThemeSurface>,
    announcer: Option<Announcer>,
    current: Cell<Theme>,
}

impl ThemeManager {
    #[must_use]
    pub fn new(
        config: ThemeConfig,
        platform: Rc<dyn Platform>,
        surface: Rc<dyn ThemeSurface>,
        announcer: Option<Announcer>,
    ) -> Self {
        Self {
            inner: Rc::new(ThemeInner { config, platform, surface, announcer, current: Cell::new(Theme::Light) }),
        }
    }

    /// Resolve and apply the initial theme, then listen for toggles and
    /// system changes.
    pub fn initialize(&self) -> Theme {
        let stored = self.stored();
        let theme = resolve_theme(stored.as_deref(), self.inner.platform.media_matches(DARK_SCHEME_QUERY));
        self.apply(theme);

        let weak = Rc::downgrade(&self.inner);
        let on_toggle = {
            let weak = weak.clone();
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Self { inner }.toggle();
                }
            })
        };
        let on_system_change = Rc::new(move |prefers_dark: bool| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.system_changed(prefers_dark);
            }
        });
        self.inner
            .surface
            .bind(ThemeHandlers { on_toggle, on_system_change });
        theme
    }

    pub fn teardown(&self) {
        self.inner.surface.unbind();
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.inner.current.get()
    }

    /// Flip, apply, persist, and announce the theme.
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.apply(next);
        self.inner
            .platform
            .storage_set(&self.inner.config.storage_key, next.as_str());
        if let Some(announcer) = &self.inner.announcer {
            announcer.announce(next.enabled_message());
        }
        log::debug!("theme toggled to {}", next.as_str());
        next
    }

    /// Follow the system scheme unless the user picked a theme explicitly.
    pub fn system_changed(&self, prefers_dark: bool) {
        if self.stored().as_deref().and_then(Theme::parse).is_some() {
            return;
        }
        self.apply(if prefers_dark { Theme::Dark } else { Theme::Light });
    }

    fn stored(&self) -> Option<String> {
        self.inner.platform.storage_get(&self.inner.config.storage_key)
    }

    fn apply(&self, theme: Theme) {
        self.inner.current.set(theme);
        self.inner.surface.apply_theme(theme);
        self.inner.surface.set_toggle_label(theme.toggle_label());
    }
}

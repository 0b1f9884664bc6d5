use super::*;
use crate::config::ThemeConfig;
use crate::platform::test_helpers::MockPlatform;
use crate::theme::{Theme, ThemeHandlers, ThemeSurface};
use std::cell::Cell;

fn press(code: &str, alt: bool) -> KeyPress {
    KeyPress { key: String::new(), code: code.to_owned(), alt, ..KeyPress::default() }
}

#[derive(Default)]
struct RecordingPage {
    has_contact: bool,
    focused_contact: Cell<u32>,
    scrolled_top: Cell<u32>,
    blurred: Cell<u32>,
    keyboard_nav: Cell<bool>,
    handlers: RefCell<Option<A11yHandlers>>,
}

impl A11ySurface for RecordingPage {
    fn focus_contact(&self) -> bool {
        if self.has_contact {
            self.focused_contact.set(self.focused_contact.get() + 1);
        }
        self.has_contact
    }

    fn scroll_to_top(&self) {
        self.scrolled_top.set(self.scrolled_top.get() + 1);
    }

    fn blur_active(&self) {
        self.blurred.set(self.blurred.get() + 1);
    }

    fn set_keyboard_nav(&self, enabled: bool) {
        self.keyboard_nav.set(enabled);
    }

    fn bind(&self, handlers: A11yHandlers) {
        *self.handlers.borrow_mut() = Some(handlers);
    }

    fn unbind(&self) {
        self.handlers.borrow_mut().take();
    }
}

struct NullRoot;

impl ThemeSurface for NullRoot {
    fn apply_theme(&self, _theme: Theme) {}
    fn set_toggle_label(&self, _label: &str) {}
    fn bind(&self, _handlers: ThemeHandlers) {}
    fn unbind(&self) {}
}

#[derive(Default)]
struct RecordingRegion {
    texts: RefCell<Vec<String>>,
}

impl LiveRegion for RecordingRegion {
    fn set_text(&self, text: &str) {
        self.texts.borrow_mut().push(text.to_owned());
    }
}

// =============================================================
// resolve_shortcut
// =============================================================

#[test]
fn alt_shortcuts_resolve_by_physical_key() {
    assert_eq!(resolve_shortcut(&press("KeyT", true)), Some(ShortcutAction::ToggleTheme));
    assert_eq!(resolve_shortcut(&press("KeyC", true)), Some(ShortcutAction::FocusContact));
    assert_eq!(resolve_shortcut(&press("KeyH", true)), Some(ShortcutAction::ScrollTop));
    assert_eq!(resolve_shortcut(&press("KeyX", true)), None);
}

#[test]
fn shortcuts_need_bare_alt_outside_editables() {
    assert_eq!(resolve_shortcut(&press("KeyT", false)), None);
    let ctrl = KeyPress { ctrl: true, ..press("KeyT", true) };
    assert_eq!(resolve_shortcut(&ctrl), None);
    let meta = KeyPress { meta: true, ..press("KeyT", true) };
    assert_eq!(resolve_shortcut(&meta), None);
    let typing = KeyPress { in_editable: true, ..press("KeyT", true) };
    assert_eq!(resolve_shortcut(&typing), None);
}

#[test]
fn escape_blurs_even_inside_editables() {
    let esc = KeyPress { key: "Escape".to_owned(), in_editable: true, ..KeyPress::default() };
    assert_eq!(resolve_shortcut(&esc), Some(ShortcutAction::BlurActive));
}

#[test]
fn help_lists_every_shortcut() {
    let help = shortcut_help();
    assert_eq!(help.len(), 4);
    assert_eq!(help[0], ("Alt + T", "Toggle dark mode"));
    assert_eq!(help[3].0, "Esc");
}

// =============================================================
// Announcer
// =============================================================

#[test]
fn announce_clears_then_fills_after_delay() {
    let platform = Rc::new(MockPlatform::new());
    let region = Rc::new(RecordingRegion::default());
    let announcer = Announcer::new(region.clone(), platform.clone());

    announcer.announce("Saved");
    assert_eq!(*region.texts.borrow(), vec![String::new()]);
    platform.advance(99);
    assert_eq!(region.texts.borrow().len(), 1);
    platform.advance(1);
    assert_eq!(region.texts.borrow().last().map(String::as_str), Some("Saved"));
}

// =============================================================
// Accessibility
// =============================================================

#[test]
fn tab_enables_keyboard_nav_and_pointer_disables() {
    let page = Rc::new(RecordingPage::default());
    let a11y = Accessibility::new(page.clone(), None, None);
    a11y.initialize();
    let handlers = page.handlers.borrow().clone().unwrap();

    let tab = KeyPress { key: "Tab".to_owned(), ..KeyPress::default() };
    assert!(!(handlers.on_key)(&tab));
    assert!(page.keyboard_nav.get());

    (handlers.on_pointer_down)();
    assert!(!page.keyboard_nav.get());
}

#[test]
fn toggle_shortcut_drives_theme_manager() {
    let platform = Rc::new(MockPlatform::new());
    let theme = ThemeManager::new(ThemeConfig::default(), platform.clone(), Rc::new(NullRoot), None);
    theme.initialize();
    let page = Rc::new(RecordingPage::default());
    let a11y = Accessibility::new(page, Some(theme.clone()), None);

    assert!(a11y.handle_key(&press("KeyT", true)));
    assert_eq!(theme.current(), Theme::Dark);
    assert_eq!(platform.storage_get("theme").as_deref(), Some("dark"));
}

#[test]
fn toggle_shortcut_without_theme_is_not_consumed() {
    let a11y = Accessibility::new(Rc::new(RecordingPage::default()), None, None);
    assert!(!a11y.perform(ShortcutAction::ToggleTheme));
}

#[test]
fn focus_contact_reports_missing_form() {
    let page = Rc::new(RecordingPage::default());
    let a11y = Accessibility::new(page.clone(), None, None);
    assert!(!a11y.handle_key(&press("KeyC", true)));

    let page = Rc::new(RecordingPage { has_contact: true, ..RecordingPage::default() });
    let a11y = Accessibility::new(page.clone(), None, None);
    assert!(a11y.handle_key(&press("KeyC", true)));
    assert_eq!(page.focused_contact.get(), 1);
}

#[test]
fn scroll_top_announces() {
    let platform = Rc::new(MockPlatform::new());
    let region = Rc::new(RecordingRegion::default());
    let page = Rc::new(RecordingPage::default());
    let a11y = Accessibility::new(page.clone(), None, Some(Announcer::new(region.clone(), platform.clone())));

    assert!(a11y.handle_key(&press("KeyH", true)));
    platform.advance(ANNOUNCE_DELAY.as_millis().try_into().unwrap());
    assert_eq!(page.scrolled_top.get(), 1);
    assert_eq!(region.texts.borrow().last().map(String::as_str), Some("Scrolled to top"));
}

#[test]
fn escape_blurs_without_consuming() {
    let page = Rc::new(RecordingPage::default());
    let a11y = Accessibility::new(page.clone(), None, None);
    let esc = KeyPress { key: "Escape".to_owned(), ..KeyPress::default() };
    assert!(!a11y.handle_key(&esc));
    assert_eq!(page.blurred.get(), 1);
}

#[test]
fn teardown_unbinds() {
    let page = Rc::new(RecordingPage::default());
    let a11y = Accessibility::new(page.clone(), None, None);
    a11y.initialize();
    a11y.teardown();
    assert!(page.handlers.borrow().is_none());
}

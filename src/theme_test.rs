use super::*;
use crate::a11y::LiveRegion;
use crate::platform::test_helpers::MockPlatform;
use std::cell::RefCell;

#[derive(Default)]
struct RecordingRoot {
    applied: RefCell<Vec<Theme>>,
    label: RefCell<String>,
    handlers: RefCell<Option<ThemeHandlers>>,
}

impl ThemeSurface for RecordingRoot {
    fn apply_theme(&self, theme: Theme) {
        self.applied.borrow_mut().push(theme);
    }

    fn set_toggle_label(&self, label: &str) {
        label.clone_into(&mut self.label.borrow_mut());
    }

    fn bind(&self, handlers: ThemeHandlers) {
        *self.handlers.borrow_mut() = Some(handlers);
    }

    fn unbind(&self) {
        self.handlers.borrow_mut().take();
    }
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

fn manager(platform: &Rc<MockPlatform>, root: &Rc<RecordingRoot>) -> ThemeManager {
    ThemeManager::new(ThemeConfig::default(), platform.clone(), root.clone(), None)
}

// =============================================================
// Theme / resolve_theme
// =============================================================

#[test]
fn theme_parse_and_labels() {
    assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
    assert_eq!(Theme::parse(" light "), Some(Theme::Light));
    assert_eq!(Theme::parse("sepia"), None);
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggle_label(), "Switch to light mode");
    assert_eq!(Theme::default(), Theme::Light);
}

#[test]
fn stored_preference_beats_system() {
    assert_eq!(resolve_theme(Some("light"), true), Theme::Light);
    assert_eq!(resolve_theme(Some("dark"), false), Theme::Dark);
}

#[test]
fn system_preference_used_without_valid_stored_value() {
    assert_eq!(resolve_theme(None, true), Theme::Dark);
    assert_eq!(resolve_theme(Some("garbage"), true), Theme::Dark);
    assert_eq!(resolve_theme(None, false), Theme::Light);
}

// =============================================================
// ThemeManager
// =============================================================

#[test]
fn initialize_applies_system_dark_and_binds() {
    let platform = Rc::new(MockPlatform::new());
    platform.prefers_dark.set(true);
    let root = Rc::new(RecordingRoot::default());
    let theme = manager(&platform, &root).initialize();

    assert_eq!(theme, Theme::Dark);
    assert_eq!(*root.applied.borrow(), vec![Theme::Dark]);
    assert_eq!(*root.label.borrow(), "Switch to light mode");
    assert!(root.handlers.borrow().is_some());
    assert!(platform.storage.borrow().is_empty());
}

#[test]
fn toggle_persists_under_theme_key() {
    let platform = Rc::new(MockPlatform::new());
    let root = Rc::new(RecordingRoot::default());
    let themes = manager(&platform, &root);
    themes.initialize();

    assert_eq!(themes.toggle(), Theme::Dark);
    assert_eq!(platform.storage_get("theme").as_deref(), Some("dark"));
    assert_eq!(themes.toggle(), Theme::Light);
    assert_eq!(platform.storage_get("theme").as_deref(), Some("light"));
    assert_eq!(*root.applied.borrow(), vec![Theme::Light, Theme::Dark, Theme::Light]);
}

#[test]
fn toggle_click_handler_flips_theme() {
    let platform = Rc::new(MockPlatform::new());
    let root = Rc::new(RecordingRoot::default());
    let themes = manager(&platform, &root);
    themes.initialize();

    let handlers = root.handlers.borrow().clone().unwrap();
    (handlers.on_toggle)();
    assert_eq!(themes.current(), Theme::Dark);
}

#[test]
fn system_change_ignored_once_user_chose() {
    let platform = Rc::new(MockPlatform::new());
    let root = Rc::new(RecordingRoot::default());
    let themes = manager(&platform, &root);
    themes.initialize();

    themes.system_changed(true);
    assert_eq!(themes.current(), Theme::Dark);

    themes.toggle();
    assert_eq!(themes.current(), Theme::Light);
    themes.system_changed(true);
    assert_eq!(themes.current(), Theme::Light);
}

#[test]
fn toggle_announces_new_mode() {
    let platform = Rc::new(MockPlatform::new());
    let root = Rc::new(RecordingRoot::default());
    let region = Rc::new(RecordingRegion::default());
    let announcer = Announcer::new(region.clone(), platform.clone());
    let themes = ThemeManager::new(ThemeConfig::default(), platform.clone(), root, Some(announcer));
    themes.initialize();

    themes.toggle();
    platform.advance(100);
    assert_eq!(*region.texts.borrow(), vec![String::new(), "Dark mode enabled".to_owned()]);
}

#[test]
fn custom_storage_key_is_respected() {
    let platform = Rc::new(MockPlatform::new());
    platform.storage_set("site-theme", "dark");
    let root = Rc::new(RecordingRoot::default());
    let config = ThemeConfig { storage_key: "site-theme".to_owned(), ..ThemeConfig::default() };
    let themes = ThemeManager::new(config, platform.clone(), root.clone(), None);
    assert_eq!(themes.initialize(), Theme::Dark);

    themes.teardown();
    assert!(root.handlers.borrow().is_none());
}

//! Page-wide surfaces: theme root, navigation, reveal targets, prefetch links,
//! keyboard handling, the live region, and window error events.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MediaQueryList, MediaQueryListEvent, NodeList, ScrollBehavior,
    ScrollToOptions, Window,
};

use super::{Listener, Listeners};
use crate::a11y::{A11yHandlers, A11ySurface, KEYBOARD_NAV_CLASS, KeyPress, LiveRegion};
use crate::errors::{ErrorSurface, UnhandledError};
use crate::nav::{NavHandlers, NavSurface, SectionBounds};
use crate::prefetch::PrefetchSurface;
use crate::reveal::{RevealKind, RevealSurface, RevealTarget};
use crate::theme::{DARK_SCHEME_QUERY, Theme, ThemeHandlers, ThemeSurface};

const ANNOUNCER_ID: &str = "a11y-announcer";
const NAV_LINK_SELECTOR: &str = "nav a[href^=\"#\"]";
const SECTION_SELECTOR: &str = "section[id]";
const REVEAL_SELECTOR: &str = "[data-animate], img[data-src]";
const REVEAL_INDEX_ATTR: &str = "data-reveal-index";
const LAZY_CLASS: &str = "lazy";

fn elements(list: Option<NodeList>) -> Vec<Element> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    elements(document.query_selector_all(selector).ok())
}

fn smooth_scroll(window: &Window, y: f64) {
    let options = ScrollToOptions::new();
    options.set_top(y);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

// =============================================================================
// THEME
// =============================================================================

pub struct BrowserTheme {
    root: Element,
    toggle: Option<Element>,
    media: Option<MediaQueryList>,
    listeners: Listeners,
}

impl BrowserTheme {
    #[must_use]
    pub fn new(window: &Window, document: &Document, toggle_id: &str) -> Option<Self> {
        Some(Self {
            root: document.document_element()?,
            toggle: document.get_element_by_id(toggle_id),
            media: window.match_media(DARK_SCHEME_QUERY).ok().flatten(),
            listeners: Listeners::default(),
        })
    }
}

impl ThemeSurface for BrowserTheme {
    fn apply_theme(&self, theme: Theme) {
        let _ = self.root.set_attribute("data-theme", theme.as_str());
    }

    fn set_toggle_label(&self, label: &str) {
        if let Some(toggle) = &self.toggle {
            let _ = toggle.set_attribute("aria-label", label);
        }
    }

    fn bind(&self, handlers: ThemeHandlers) {
        self.listeners.clear();
        if let Some(toggle) = &self.toggle {
            let on_toggle = handlers.on_toggle;
            self.listeners
                .push(Listener::new(toggle, "click", move |_| on_toggle()));
        }
        if let Some(media) = &self.media {
            let on_system_change = handlers.on_system_change;
            self.listeners.push(Listener::new(media, "change", move |event| {
                if let Some(event) = event.dyn_ref::<MediaQueryListEvent>() {
                    on_system_change(event.matches());
                }
            }));
        }
    }

    fn unbind(&self) {
        self.listeners.clear();
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

pub struct BrowserNav {
    window: Window,
    header: Option<Element>,
    links: Vec<Element>,
    sections: Vec<Element>,
    listeners: Listeners,
}

impl BrowserNav {
    #[must_use]
    pub fn new(window: Window, document: &Document) -> Self {
        Self {
            window,
            header: document.query_selector("header").ok().flatten(),
            links: select_all(document, NAV_LINK_SELECTOR),
            sections: select_all(document, SECTION_SELECTOR),
            listeners: Listeners::default(),
        }
    }
}

impl NavSurface for BrowserNav {
    fn sections(&self) -> Vec<SectionBounds> {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        self.sections
            .iter()
            .map(|section| {
                let rect = section.get_bounding_client_rect();
                SectionBounds { id: section.id(), top: rect.top() + scroll_y, height: rect.height() }
            })
            .collect()
    }

    fn set_active_link(&self, id: Option<&str>) {
        let target = id.map(|id| format!("#{id}"));
        for link in &self.links {
            let active = target.is_some() && link.get_attribute("href") == target;
            let _ = link.class_list().toggle_with_force("active", active);
        }
    }

    fn set_scrolled(&self, scrolled: bool) {
        if let Some(header) = &self.header {
            let _ = header.class_list().toggle_with_force("scrolled", scrolled);
        }
    }

    fn scroll_to(&self, y: f64) {
        smooth_scroll(&self.window, y);
    }

    fn bind(&self, handlers: NavHandlers) {
        self.listeners.clear();
        let window = self.window.clone();
        let on_scroll = handlers.on_scroll;
        self.listeners.push(Listener::new(&self.window, "scroll", move |_| {
            on_scroll(window.scroll_y().unwrap_or(0.0));
        }));
        for link in &self.links {
            let Some(href) = link.get_attribute("href") else {
                continue;
            };
            let on_anchor_click = handlers.on_anchor_click.clone();
            self.listeners.push(Listener::new(link, "click", move |event| {
                if on_anchor_click(&href) {
                    event.prevent_default();
                }
            }));
        }
    }

    fn unbind(&self) {
        self.listeners.clear();
    }
}

// =============================================================================
// REVEAL
// =============================================================================

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

pub struct BrowserReveal {
    window: Window,
    targets: Vec<Element>,
    observer: RefCell<Option<IntersectionObserver>>,
    callback: RefCell<Option<ObserverCallback>>,
}

impl BrowserReveal {
    #[must_use]
    pub fn new(window: Window, document: &Document) -> Self {
        let targets = select_all(document, REVEAL_SELECTOR);
        for (index, el) in targets.iter().enumerate() {
            let _ = el.set_attribute(REVEAL_INDEX_ATTR, &index.to_string());
        }
        Self { window, targets, observer: RefCell::new(None), callback: RefCell::new(None) }
    }

    fn supports_observer(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }
}

impl RevealSurface for BrowserReveal {
    fn targets(&self) -> Vec<RevealTarget> {
        self.targets
            .iter()
            .enumerate()
            .map(|(index, el)| {
                let kind = match el.get_attribute("data-src") {
                    Some(src) if el.dyn_ref::<HtmlImageElement>().is_some() => RevealKind::LazyImage { src },
                    _ => RevealKind::Animate,
                };
                RevealTarget { index, kind }
            })
            .collect()
    }

    fn observe(&self, indices: &[usize], on_enter: Rc<dyn Fn(usize)>) -> bool {
        if !self.supports_observer() {
            return false;
        }
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let index = entry
                    .target()
                    .get_attribute(REVEAL_INDEX_ATTR)
                    .and_then(|raw| raw.parse().ok());
                if let Some(index) = index {
                    on_enter(index);
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(0.1));
        init.set_root_margin("0px 0px -50px 0px");
        let Ok(observer) = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) else {
            return false;
        };
        for index in indices {
            if let Some(el) = self.targets.get(*index) {
                observer.observe(el);
            }
        }
        *self.observer.borrow_mut() = Some(observer);
        *self.callback.borrow_mut() = Some(callback);
        true
    }

    fn unobserve(&self, index: usize) {
        if let (Some(observer), Some(el)) = (self.observer.borrow().as_ref(), self.targets.get(index)) {
            observer.unobserve(el);
        }
    }

    fn add_class(&self, index: usize, class: &str) {
        if let Some(el) = self.targets.get(index) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn load_image(&self, index: usize, src: &str) {
        let Some(el) = self.targets.get(index) else {
            return;
        };
        if let Some(img) = el.dyn_ref::<HtmlImageElement>() {
            img.set_src(src);
        }
        let _ = el.remove_attribute("data-src");
        let _ = el.class_list().remove_1(LAZY_CLASS);
    }

    fn disconnect(&self) {
        if let Some(observer) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
        self.callback.borrow_mut().take();
    }
}

// =============================================================================
// PREFETCH
// =============================================================================

pub struct BrowserPrefetch {
    document: Document,
    links: Vec<Element>,
    listeners: Listeners,
}

impl BrowserPrefetch {
    #[must_use]
    pub fn new(document: &Document) -> Self {
        Self { document: document.clone(), links: select_all(document, "a[href]"), listeners: Listeners::default() }
    }
}

impl PrefetchSurface for BrowserPrefetch {
    fn insert_prefetch(&self, href: &str) {
        let (Some(head), Ok(link)) = (self.document.head(), self.document.create_element("link")) else {
            return;
        };
        let _ = link.set_attribute("rel", "prefetch");
        let _ = link.set_attribute("href", href);
        let _ = head.append_child(&link);
    }

    fn bind(&self, on_intent: Rc<dyn Fn(&str)>) {
        self.listeners.clear();
        for link in &self.links {
            let Some(href) = link.get_attribute("href") else {
                continue;
            };
            for event in ["mouseenter", "focus"] {
                let on_intent = Rc::clone(&on_intent);
                let href = href.clone();
                self.listeners
                    .push(Listener::new(link, event, move |_| on_intent(&href)));
            }
        }
    }

    fn unbind(&self) {
        self.listeners.clear();
    }
}

// =============================================================================
// ACCESSIBILITY
// =============================================================================

pub struct BrowserA11y {
    window: Window,
    document: Document,
    contact_form_id: String,
    listeners: Listeners,
}

impl BrowserA11y {
    #[must_use]
    pub fn new(window: Window, document: Document, contact_form_id: String) -> Self {
        Self { window, document, contact_form_id, listeners: Listeners::default() }
    }
}

fn focus_is_editable(document: &Document) -> bool {
    let Some(active) = document.active_element() else {
        return false;
    };
    matches!(active.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
        || active
            .dyn_ref::<HtmlElement>()
            .is_some_and(HtmlElement::is_content_editable)
}

impl A11ySurface for BrowserA11y {
    fn focus_contact(&self) -> bool {
        let field = self
            .document
            .get_element_by_id(&self.contact_form_id)
            .and_then(|form| form.query_selector("input, textarea").ok().flatten())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        field.is_some_and(|field| field.focus().is_ok())
    }

    fn scroll_to_top(&self) {
        smooth_scroll(&self.window, 0.0);
    }

    fn blur_active(&self) {
        if let Some(active) = self
            .document
            .active_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = active.blur();
        }
    }

    fn set_keyboard_nav(&self, enabled: bool) {
        if let Some(body) = self.document.body() {
            let _ = body.class_list().toggle_with_force(KEYBOARD_NAV_CLASS, enabled);
        }
    }

    fn bind(&self, handlers: A11yHandlers) {
        self.listeners.clear();
        let document = self.document.clone();
        let on_key = handlers.on_key;
        self.listeners.push(Listener::new(&self.document, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let press = KeyPress {
                key: key.key(),
                code: key.code(),
                alt: key.alt_key(),
                ctrl: key.ctrl_key(),
                meta: key.meta_key(),
                in_editable: focus_is_editable(&document),
            };
            if on_key(&press) {
                event.prevent_default();
            }
        }));
        let on_pointer_down = handlers.on_pointer_down;
        self.listeners
            .push(Listener::new(&self.document, "mousedown", move |_| on_pointer_down()));
    }

    fn unbind(&self) {
        self.listeners.clear();
    }
}

// =============================================================================
// LIVE REGION
// =============================================================================

pub struct BrowserLiveRegion {
    element: Element,
}

impl BrowserLiveRegion {
    /// Reuse the page's announcer element or append a visually hidden one.
    #[must_use]
    pub fn ensure(document: &Document) -> Option<Self> {
        if let Some(element) = document.get_element_by_id(ANNOUNCER_ID) {
            return Some(Self { element });
        }
        let element = document.create_element("div").ok()?;
        element.set_id(ANNOUNCER_ID);
        let _ = element.set_attribute("aria-live", "polite");
        let _ = element.set_attribute("aria-atomic", "true");
        element.set_class_name("sr-only");
        document.body()?.append_child(&element).ok()?;
        Some(Self { element })
    }
}

impl LiveRegion for BrowserLiveRegion {
    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}

// =============================================================================
// ERRORS
// =============================================================================

pub struct BrowserErrors {
    window: Window,
    listeners: Listeners,
}

impl BrowserErrors {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window, listeners: Listeners::default() }
    }
}

impl ErrorSurface for BrowserErrors {
    fn bind(&self, on_error: Rc<dyn Fn(UnhandledError)>) {
        self.listeners.clear();
        {
            let on_error = Rc::clone(&on_error);
            self.listeners.push(Listener::new(&self.window, "error", move |event| {
                if let Some(event) = event.dyn_ref::<web_sys::ErrorEvent>() {
                    on_error(UnhandledError::Script {
                        message: event.message(),
                        file: event.filename(),
                        line: event.lineno(),
                        column: event.colno(),
                    });
                }
            }));
        }
        self.listeners
            .push(Listener::new(&self.window, "unhandledrejection", move |event| {
                if let Some(event) = event.dyn_ref::<web_sys::PromiseRejectionEvent>() {
                    let reason = event.reason();
                    let reason = reason.as_string().unwrap_or_else(|| format!("{reason:?}"));
                    on_error(UnhandledError::Rejection { reason });
                }
            }));
    }

    fn unbind(&self) {
        self.listeners.clear();
    }
}

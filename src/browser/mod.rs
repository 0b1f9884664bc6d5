//! Browser bindings for every page component.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only compiled with the `hydrate` feature. Each submodule implements one of
//! the surface traits over `web-sys` elements; [`boot`] wires them together
//! and keeps the resulting components alive for the lifetime of the page.
//!
//! ERROR HANDLING
//! ==============
//! Missing elements or unsupported APIs degrade to a skipped component or a
//! no-op write. DOM call failures are discarded with `let _ =`.

pub mod form;
pub mod page;
pub mod platform;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::a11y::{Accessibility, Announcer};
use crate::config::{CONFIG_ELEMENT_ID, SiteConfig};
use crate::contact::{FormSubmissionController, FormSurface, HttpDelivery};
use crate::errors::ErrorReporter;
use crate::nav::NavHighlighter;
use crate::platform::Platform;
use crate::prefetch::PrefetchSet;
use crate::reveal::RevealTracker;
use crate::theme::ThemeManager;

pub use form::BrowserForm;
pub use platform::BrowserPlatform;

/// An event listener that detaches itself when dropped.
pub struct Listener {
    target: web_sys::EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    pub fn new(
        target: &web_sys::EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self { target: target.clone(), event, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Listeners owned by one surface, released together on `unbind`.
#[derive(Default)]
pub struct Listeners(RefCell<Vec<Listener>>);

impl Listeners {
    pub fn push(&self, listener: Option<Listener>) {
        if let Some(listener) = listener {
            self.0.borrow_mut().push(listener);
        }
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Every component built for the current page.
struct Page {
    errors: ErrorReporter,
    theme: Option<ThemeManager>,
    nav: NavHighlighter,
    reveal: RevealTracker,
    prefetch: PrefetchSet,
    a11y: Accessibility,
    contact: Option<FormSubmissionController>,
}

impl Page {
    fn teardown(&self) {
        if let Some(contact) = &self.contact {
            contact.teardown();
        }
        self.a11y.teardown();
        self.prefetch.teardown();
        self.reveal.teardown();
        self.nav.teardown();
        if let Some(theme) = &self.theme {
            theme.teardown();
        }
        self.errors.teardown();
    }
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

fn read_config(document: &web_sys::Document) -> SiteConfig {
    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    SiteConfig::from_json_or_default(raw.as_deref())
}

/// Build and initialize every component against the live document.
/// Calling it again tears the previous page down first.
pub fn boot() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    shutdown();

    let errors = ErrorReporter::new(Rc::new(page::BrowserErrors::new(window.clone())));
    errors.install();

    let config = read_config(&document);
    let platform: Rc<dyn Platform> = Rc::new(BrowserPlatform::new(window.clone()));

    let announcer = page::BrowserLiveRegion::ensure(&document)
        .map(|region| Announcer::new(Rc::new(region), Rc::clone(&platform)));

    let theme = page::BrowserTheme::new(&window, &document, &config.theme.toggle_id).map(|surface| {
        let manager = ThemeManager::new(config.theme.clone(), Rc::clone(&platform), Rc::new(surface), announcer.clone());
        let initial = manager.initialize();
        log::debug!("theme initialized: {}", initial.as_str());
        manager
    });

    let nav = NavHighlighter::new(config.nav, Rc::new(page::BrowserNav::new(window.clone(), &document)));
    nav.initialize(window.scroll_y().unwrap_or(0.0));

    let reveal = RevealTracker::new(Rc::new(page::BrowserReveal::new(window.clone(), &document)));
    reveal.initialize();

    let origin = window.location().origin().unwrap_or_default();
    let prefetch = PrefetchSet::new(origin, Rc::new(page::BrowserPrefetch::new(&document)));
    prefetch.initialize();

    let a11y = Accessibility::new(
        Rc::new(page::BrowserA11y::new(window.clone(), document.clone(), config.contact.form_id.clone())),
        theme.clone(),
        announcer,
    );
    a11y.initialize();

    let form = BrowserForm::find(&document, &config.contact.form_id).map(|form| Rc::new(form) as Rc<dyn FormSurface>);
    let contact = FormSubmissionController::initialize(config.contact, form, platform, Rc::new(HttpDelivery));
    if contact.is_none() {
        log::debug!("no contact form on this page");
    }

    PAGE.with(|slot| {
        *slot.borrow_mut() = Some(Page { errors, theme, nav, reveal, prefetch, a11y, contact });
    });
    log::info!("page enhancements ready");
}

/// Tear down the components built by [`boot`] and release their listeners.
pub fn shutdown() {
    let page = PAGE.with(|slot| slot.borrow_mut().take());
    if let Some(page) = page {
        page.teardown();
    }
}

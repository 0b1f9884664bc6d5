//! `FormSurface` over the contact `<form>`.
//!
//! Expected markup: inputs addressed by `name`, each optionally followed by a
//! sibling `.error-message` element inside the same parent; one
//! `button[type="submit"]`; one `.form-status` element inside the form.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use super::{Listener, Listeners};
use crate::contact::field::contact_fields;
use crate::contact::status::StatusView;
use crate::contact::{FormHandlers, FormSurface};

const ERROR_CLASS: &str = "error";
const ERROR_MESSAGE_SELECTOR: &str = ".error-message";
const STATUS_SELECTOR: &str = ".form-status";
const SUBMIT_SELECTOR: &str = "button[type=\"submit\"]";

pub struct BrowserForm {
    form: HtmlFormElement,
    listeners: Listeners,
}

impl BrowserForm {
    /// Look up the form by element id.
    #[must_use]
    pub fn find(document: &Document, form_id: &str) -> Option<Self> {
        let form = document
            .get_element_by_id(form_id)?
            .dyn_into::<HtmlFormElement>()
            .ok()?;
        Some(Self { form, listeners: Listeners::default() })
    }

    fn field(&self, name: &str) -> Option<Element> {
        self.form
            .query_selector(&format!("[name=\"{name}\"]"))
            .ok()
            .flatten()
    }

    fn submit_button(&self) -> Option<HtmlButtonElement> {
        self.form
            .query_selector(SUBMIT_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into().ok())
    }

    fn error_slot(field: &Element) -> Option<Element> {
        field
            .parent_element()?
            .query_selector(ERROR_MESSAGE_SELECTOR)
            .ok()
            .flatten()
    }
}

fn read_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    el.dyn_ref::<HtmlTextAreaElement>().map(HtmlTextAreaElement::value)
}

fn write_value(el: &Element, value: &str) {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    }
}

impl FormSurface for BrowserForm {
    fn field_value(&self, name: &str) -> Option<String> {
        read_value(&self.field(name)?)
    }

    fn set_field_value(&self, name: &str, value: &str) {
        if let Some(el) = self.field(name) {
            write_value(&el, value);
        }
    }

    fn set_field_error(&self, name: &str, error: Option<&str>) {
        let Some(el) = self.field(name) else {
            return;
        };
        let _ = el.class_list().toggle_with_force(ERROR_CLASS, error.is_some());
        let _ = el.set_attribute("aria-invalid", if error.is_some() { "true" } else { "false" });
        if let Some(slot) = Self::error_slot(&el) {
            slot.set_text_content(error);
        }
    }

    fn submit_label(&self) -> String {
        self.submit_button()
            .and_then(|button| button.text_content())
            .unwrap_or_default()
    }

    fn set_submit_state(&self, enabled: bool, label: &str) {
        if let Some(button) = self.submit_button() {
            button.set_disabled(!enabled);
            button.set_text_content(Some(label));
        }
    }

    fn render_status(&self, status: &StatusView) {
        let Some(el) = self.form.query_selector(STATUS_SELECTOR).ok().flatten() else {
            return;
        };
        let mut class = String::from("form-status");
        if let Some(kind) = status.kind {
            class.push(' ');
            class.push_str(kind.css_class());
        }
        if status.visible {
            class.push_str(" show");
        }
        el.set_class_name(&class);
        el.set_text_content(Some(&status.text));
    }

    fn action(&self) -> Option<String> {
        self.form.get_attribute("action")
    }

    fn bind(&self, handlers: FormHandlers) {
        self.listeners.clear();
        for field in contact_fields() {
            let Some(el) = self.field(&field.name) else {
                continue;
            };
            for event in ["blur", "input"] {
                let on_field_event = handlers.on_field_event.clone();
                let name = field.name.clone();
                self.listeners
                    .push(Listener::new(&el, event, move |_| on_field_event(&name)));
            }
        }
        let on_submit = handlers.on_submit;
        self.listeners.push(Listener::new(&self.form, "submit", move |event| {
            event.prevent_default();
            on_submit();
        }));
    }

    fn unbind(&self) {
        self.listeners.clear();
    }
}

//! Contact form lifecycle: validation, delivery, fallback, status feedback.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller owns the mounted form's in-memory state (field values, error
//! annotations, the transient status) and talks to the page only through
//! [`FormSurface`], [`Platform`], and [`Delivery`].
//!
//! DESIGN
//! ======
//! `submit` walks `Idle -> Submitting -> {Delivered | FallbackTriggered} -> Idle`.
//! The submit control is disabled by a drop guard for the whole `Submitting`
//! span, so it is re-enabled on every exit path, including a dropped future.
//! Invalid fields block the submit before anything is sent.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use uuid::Uuid;

use super::delivery::{Delivery, DeliveryError, DeliveryRequest};
use super::fallback::mailto_uri;
use super::field::{FormField, contact_fields};
use super::status::{StatusKind, StatusView};
use crate::config::ContactConfig;
use crate::platform::Platform;

pub const SENDING_LABEL: &str = "Sending...";
pub const DELIVERED_MESSAGE: &str = "Thank you! Your message has been sent.";
pub const FALLBACK_MESSAGE: &str = "Opening your email client...";

/// Element access for the contact form.
pub trait FormSurface {
    /// Current raw value of the named input, if it exists.
    fn field_value(&self, name: &str) -> Option<String>;
    fn set_field_value(&self, name: &str, value: &str);
    /// Mark (`Some`) or clear (`None`) the field's error state and message.
    fn set_field_error(&self, name: &str, error: Option<&str>);
    fn submit_label(&self) -> String;
    fn set_submit_state(&self, enabled: bool, label: &str);
    fn render_status(&self, status: &StatusView);
    /// The form's `action` URL.
    fn action(&self) -> Option<String>;
    /// Attach blur/input/submit listeners.
    fn bind(&self, handlers: FormHandlers);
    /// Detach listeners installed by [`FormSurface::bind`].
    fn unbind(&self);
}

/// Callbacks the surface invokes for DOM events.
#[derive(Clone)]
pub struct FormHandlers {
    /// Blur or input on the named field.
    pub on_field_event: Rc<dyn Fn(&str)>,
    /// Submit intercepted (default navigation already prevented).
    pub on_submit: Rc<dyn Fn()>,
}

/// Resolution of one submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Delivered,
    FallbackTriggered,
}

/// One submit action, snapshotted at submit time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionAttempt {
    pub id: Uuid,
    pub fields: Vec<(String, String)>,
    pub outcome: Outcome,
    pub status_message: String,
}

/// Reasons a submit never left `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("a submission is already in flight")]
    InFlight,
    #[error("invalid fields: {}", .fields.join(", "))]
    Invalid { fields: Vec<String> },
}

/// Owns the contact form. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct FormSubmissionController {
    inner: Rc<Inner>,
}

struct Inner {
    config: ContactConfig,
    endpoint: Option<String>,
    surface: Rc<dyn FormSurface>,
    platform: Rc<dyn Platform>,
    delivery: Rc<dyn Delivery>,
    fields: RefCell<Vec<FormField>>,
    status: RefCell<StatusView>,
    submitting: Cell<bool>,
}

impl FormSubmissionController {
    /// Bind the controller to a form. Returns `None` without side effects when
    /// the form is absent.
    pub fn initialize(
        config: ContactConfig,
        form: Option<Rc<dyn FormSurface>>,
        platform: Rc<dyn Platform>,
        delivery: Rc<dyn Delivery>,
    ) -> Option<Self> {
        let surface = form?;
        let endpoint = config
            .endpoint
            .clone()
            .or_else(|| surface.action())
            .filter(|url| !url.trim().is_empty());
        if endpoint.is_none() {
            log::warn!("contact form has no endpoint; every submit will use the mailto fallback");
        }
        let controller = Self {
            inner: Rc::new(Inner {
                config,
                endpoint,
                surface,
                platform,
                delivery,
                fields: RefCell::new(contact_fields()),
                status: RefCell::new(StatusView::default()),
                submitting: Cell::new(false),
            }),
        };
        controller.inner.surface.bind(controller.handlers());
        Some(controller)
    }

    /// Detach DOM listeners. The controller stays usable programmatically.
    pub fn teardown(&self) {
        self.inner.surface.unbind();
    }

    fn handlers(&self) -> FormHandlers {
        let weak = Rc::downgrade(&self.inner);
        let on_field_event = {
            let weak = Weak::clone(&weak);
            Rc::new(move |name: &str| {
                if let Some(inner) = weak.upgrade() {
                    let _ = Self { inner }.validate_named(name);
                }
            })
        };
        let on_submit = Rc::new(move || {
            let Some(inner) = weak.upgrade() else { return };
            let controller = Self { inner };
            let platform = Rc::clone(&controller.inner.platform);
            platform.spawn(Box::pin(async move {
                if let Err(e) = controller.submit().await {
                    log::debug!("submit ignored: {e}");
                }
            }));
        });
        FormHandlers { on_field_event, on_submit }
    }

    /// Validate one field and mirror the result onto the surface.
    pub fn validate_field(&self, field: &mut FormField) -> bool {
        let valid = field.validate();
        self.inner
            .surface
            .set_field_error(&field.name, field.error_message);
        valid
    }

    /// Refresh the named field from the surface and validate it.
    ///
    /// Returns `None` for names the contact form does not own and for
    /// controls missing from the page; those are skipped, never failed.
    pub fn validate_named(&self, name: &str) -> Option<bool> {
        let mut field = self
            .inner
            .fields
            .borrow()
            .iter()
            .find(|f| f.name == name)
            .cloned()?;
        field.value = self.inner.surface.field_value(name)?;
        let valid = self.validate_field(&mut field);
        if let Some(slot) = self
            .inner
            .fields
            .borrow_mut()
            .iter_mut()
            .find(|f| f.name == name)
        {
            *slot = field;
        }
        Some(valid)
    }

    /// Validate every field; returns the names of the invalid ones.
    fn validate_all(&self) -> Vec<String> {
        let names = self
            .inner
            .fields
            .borrow()
            .iter()
            .map(|f| f.name.clone())
            .collect::<Vec<_>>();
        names
            .into_iter()
            .filter(|name| self.validate_named(name) == Some(false))
            .collect()
    }

    /// Whether a submit is currently between start and resolution.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.inner.submitting.get()
    }

    #[must_use]
    pub fn status(&self) -> StatusView {
        self.inner.status.borrow().clone()
    }

    #[must_use]
    pub fn fields(&self) -> Vec<FormField> {
        self.inner.fields.borrow().clone()
    }

    /// Run one submission.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected::InFlight`] while another submit is pending and
    /// [`SubmitRejected::Invalid`] when validation fails. Delivery failures are
    /// not errors here; they resolve as [`Outcome::FallbackTriggered`].
    pub async fn submit(&self) -> Result<SubmissionAttempt, SubmitRejected> {
        if self.inner.submitting.get() {
            return Err(SubmitRejected::InFlight);
        }
        let invalid = self.validate_all();
        if !invalid.is_empty() {
            return Err(SubmitRejected::Invalid { fields: invalid });
        }

        let guard = SubmitGuard::engage(&self.inner);
        self.inner.clear_status_now();

        let mut attempt = SubmissionAttempt {
            id: Uuid::new_v4(),
            fields: self.snapshot(),
            outcome: Outcome::Pending,
            status_message: String::new(),
        };
        log::info!("contact submit {} started", attempt.id);

        let result = match &self.inner.endpoint {
            Some(endpoint) => {
                let request = DeliveryRequest { endpoint: endpoint.clone(), fields: attempt.fields.clone() };
                self.inner.delivery.deliver(&request).await
            }
            None => Err(DeliveryError::Transport("no endpoint configured".to_owned())),
        };

        let kind = match result {
            Ok(()) => {
                log::info!("contact submit {} delivered", attempt.id);
                self.clear_fields();
                attempt.outcome = Outcome::Delivered;
                DELIVERED_MESSAGE.clone_into(&mut attempt.status_message);
                StatusKind::Success
            }
            Err(e) => {
                log::warn!("contact submit {} falling back to mailto: {e}", attempt.id);
                self.inner.platform.navigate(&self.fallback_uri(&attempt));
                attempt.outcome = Outcome::FallbackTriggered;
                FALLBACK_MESSAGE.clone_into(&mut attempt.status_message);
                StatusKind::Info
            }
        };

        drop(guard);
        Inner::show_status(&self.inner, &attempt.status_message, kind);
        Ok(attempt)
    }

    fn snapshot(&self) -> Vec<(String, String)> {
        self.inner
            .fields
            .borrow()
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    fn clear_fields(&self) {
        let mut fields = self.inner.fields.borrow_mut();
        for field in fields.iter_mut() {
            field.value.clear();
            field.error_message = None;
            self.inner.surface.set_field_value(&field.name, "");
        }
    }

    fn fallback_uri(&self, attempt: &SubmissionAttempt) -> String {
        let value = |name: &str| {
            attempt
                .fields
                .iter()
                .find(|(key, _)| key == name)
                .map_or("", |(_, v)| v.as_str())
        };
        mailto_uri(
            &self.inner.config.recipient,
            &self.inner.config.subject_prefix,
            value("name"),
            value("email"),
            value("message"),
        )
    }
}

impl Inner {
    fn render_status(&self) {
        let view = self.status.borrow().clone();
        self.surface.render_status(&view);
    }

    fn clear_status_now(&self) {
        self.status.borrow_mut().clear_now();
        self.render_status();
    }

    /// Show a status and arm the fade/wipe steps for its generation.
    fn show_status(this: &Rc<Self>, text: &str, kind: StatusKind) {
        let generation = this.status.borrow_mut().show(text, kind);
        this.render_status();

        let weak = Rc::downgrade(this);
        let fade = this.config.status_fade();
        this.platform.set_timeout(
            this.config.status_visible(),
            Box::new(move || {
                let Some(inner) = weak.upgrade() else { return };
                if !inner.status.borrow_mut().fade(generation) {
                    return;
                }
                inner.render_status();

                let weak = Rc::downgrade(&inner);
                inner.platform.set_timeout(
                    fade,
                    Box::new(move || {
                        let Some(inner) = weak.upgrade() else { return };
                        if inner.status.borrow_mut().reset(generation) {
                            inner.render_status();
                        }
                    }),
                );
            }),
        );
    }
}

/// Holds the submit control disabled; restores it on drop.
struct SubmitGuard<'a> {
    inner: &'a Inner,
    label: String,
}

impl<'a> SubmitGuard<'a> {
    fn engage(inner: &'a Inner) -> Self {
        let label = inner.surface.submit_label();
        inner.submitting.set(true);
        inner.surface.set_submit_state(false, SENDING_LABEL);
        Self { inner, label }
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.inner.submitting.set(false);
        self.inner.surface.set_submit_state(true, &self.label);
    }
}

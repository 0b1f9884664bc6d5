//! Contact form fields and their format checks.
//!
//! Validation is purely a function of kind, `required`, and the trimmed value;
//! rendering the resulting message is left to the controller.

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const REQUIRED_FIELD_MESSAGE: &str = "This field is required.";
pub const REQUIRED_MESSAGE_MESSAGE: &str = "Please enter your message.";

/// Input control kinds the contact form understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    ShortText,
    MultilineText,
}

/// One input control of the contact form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
    /// Present only while the field is invalid.
    pub error_message: Option<&'static str>,
}

impl FormField {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self { name: name.into(), kind, value: String::new(), required, error_message: None }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Re-run validation, updating `error_message`. Returns `true` when valid.
    pub fn validate(&mut self) -> bool {
        self.error_message = field_error(self.kind, self.required, &self.value);
        self.error_message.is_none()
    }
}

/// The fixed field set of the contact form: `name`, `email`, `message`.
#[must_use]
pub fn contact_fields() -> Vec<FormField> {
    vec![
        FormField::new("name", FieldKind::ShortText, true),
        FormField::new("email", FieldKind::Email, true),
        FormField::new("message", FieldKind::MultilineText, true),
    ]
}

/// Whitespace as browsers match it with `\s`: Unicode white space plus the
/// byte-order mark.
fn is_form_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Error message for a value, or `None` when it passes.
///
/// The email shape check only applies to non-empty values; a blank required
/// email falls through to the generic required-field message.
#[must_use]
pub fn field_error(kind: FieldKind, required: bool, value: &str) -> Option<&'static str> {
    let value = value.trim_matches(is_form_whitespace);
    if kind == FieldKind::Email && !value.is_empty() {
        return (!is_valid_email(value)).then_some(INVALID_EMAIL_MESSAGE);
    }
    if !required || !value.is_empty() {
        return None;
    }
    match kind {
        FieldKind::MultilineText => Some(REQUIRED_MESSAGE_MESSAGE),
        FieldKind::Email | FieldKind::ShortText => Some(REQUIRED_FIELD_MESSAGE),
    }
}

/// Shape check: `local@domain.tld` where no part contains whitespace or `@`
/// and the domain has a dot with text on both sides.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(is_form_whitespace) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

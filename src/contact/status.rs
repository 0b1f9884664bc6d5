//! Transient status message shown under the contact form.
//!
//! DESIGN
//! ======
//! Hiding is two scheduled steps (fade, then wipe) so the CSS fade is visible
//! before the text disappears. Every `show`/`clear_now` bumps `generation`;
//! a scheduled step carries the generation it was armed with and is ignored
//! once a newer status has replaced it.

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;

/// Category classification of a status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Info,
}

impl StatusKind {
    /// CSS class applied to the status element.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusView {
    pub text: String,
    pub kind: Option<StatusKind>,
    pub visible: bool,
    pub generation: u64,
}

impl StatusView {
    /// Show a new message; returns the generation hide steps must match.
    pub fn show(&mut self, text: &str, kind: StatusKind) -> u64 {
        self.generation += 1;
        text.clone_into(&mut self.text);
        self.kind = Some(kind);
        self.visible = true;
        self.generation
    }

    /// Wipe immediately, invalidating any pending hide steps.
    pub fn clear_now(&mut self) {
        self.generation += 1;
        self.text.clear();
        self.kind = None;
        self.visible = false;
    }

    /// First hide step. Returns `false` (and does nothing) when stale.
    pub fn fade(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.visible = false;
        true
    }

    /// Second hide step: clear text and classification. Returns `false` when stale.
    pub fn reset(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.visible = false;
        self.text.clear();
        self.kind = None;
        true
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.kind.is_none()
    }
}

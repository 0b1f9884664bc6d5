//! Page configuration parsed from an optional inline JSON block.
//!
//! The static page may embed
//! `<script type="application/json" id="site-config">{ ... }</script>`.
//! Every key is optional; missing keys fall back to the defaults below.

use std::time::Duration;

use serde::Deserialize;

use crate::contact::field::is_valid_email;

pub const CONFIG_ELEMENT_ID: &str = "site-config";
pub const DEFAULT_FORM_ID: &str = "contact-form";
pub const DEFAULT_RECIPIENT: &str = "hello@example.com";
pub const DEFAULT_SUBJECT_PREFIX: &str = "Portfolio Contact from";
pub const DEFAULT_STATUS_VISIBLE_MS: u64 = 5000;
pub const DEFAULT_STATUS_FADE_MS: u64 = 300;
/// Longest delay browser timers honor; larger values wrap to an immediate fire.
pub const MAX_TIMER_MS: u64 = 2_147_483_647;
pub const DEFAULT_THEME_STORAGE_KEY: &str = "theme";
pub const DEFAULT_THEME_TOGGLE_ID: &str = "theme-toggle";
pub const DEFAULT_NAV_OFFSET_PX: f64 = 100.0;
pub const DEFAULT_SCROLLED_THRESHOLD_PX: f64 = 50.0;

/// Errors produced while loading [`SiteConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The inline JSON block could not be deserialized.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is out of range.
    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub contact: ContactConfig,
    pub theme: ThemeConfig,
    pub nav: NavConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Element id of the contact `<form>`.
    pub form_id: String,
    /// Overrides the form's `action` attribute when set.
    pub endpoint: Option<String>,
    /// Fixed address used by the `mailto:` fallback.
    pub recipient: String,
    pub subject_prefix: String,
    pub status_visible_ms: u64,
    pub status_fade_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            form_id: DEFAULT_FORM_ID.to_owned(),
            endpoint: None,
            recipient: DEFAULT_RECIPIENT.to_owned(),
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_owned(),
            status_visible_ms: DEFAULT_STATUS_VISIBLE_MS,
            status_fade_ms: DEFAULT_STATUS_FADE_MS,
        }
    }
}

impl ContactConfig {
    #[must_use]
    pub fn status_visible(&self) -> Duration {
        Duration::from_millis(self.status_visible_ms)
    }

    #[must_use]
    pub fn status_fade(&self) -> Duration {
        Duration::from_millis(self.status_fade_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub toggle_id: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_THEME_STORAGE_KEY.to_owned(),
            toggle_id: DEFAULT_THEME_TOGGLE_ID.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Distance above a section's top at which it counts as current.
    pub offset_px: f64,
    /// Scroll depth after which the header is marked as scrolled.
    pub scrolled_threshold_px: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self { offset_px: DEFAULT_NAV_OFFSET_PX, scrolled_threshold_px: DEFAULT_SCROLLED_THRESHOLD_PX }
    }
}

impl SiteConfig {
    /// Parse and validate config from the inline JSON block.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the optional JSON block, logging and falling back to defaults on
    /// any error so a bad config never disables the page.
    #[must_use]
    pub fn from_json_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::default();
        };
        match Self::from_json(raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("site config rejected, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contact.form_id.trim().is_empty() {
            return Err(invalid("contact.form_id", "must not be empty"));
        }
        if !is_valid_email(&self.contact.recipient) {
            return Err(invalid(
                "contact.recipient",
                format!("'{}' is not an email address", self.contact.recipient),
            ));
        }
        if self.contact.status_visible_ms == 0 {
            return Err(invalid("contact.status_visible_ms", "must be greater than zero"));
        }
        if self.contact.status_fade_ms == 0 {
            return Err(invalid("contact.status_fade_ms", "must be greater than zero"));
        }
        if self.contact.status_visible_ms > MAX_TIMER_MS {
            return Err(invalid("contact.status_visible_ms", format!("must be at most {MAX_TIMER_MS}")));
        }
        if self.contact.status_fade_ms > MAX_TIMER_MS {
            return Err(invalid("contact.status_fade_ms", format!("must be at most {MAX_TIMER_MS}")));
        }
        if self.theme.storage_key.trim().is_empty() {
            return Err(invalid("theme.storage_key", "must not be empty"));
        }
        if !(self.nav.offset_px.is_finite() && self.nav.offset_px >= 0.0) {
            return Err(invalid("nav.offset_px", "must be a non-negative number"));
        }
        if !(self.nav.scrolled_threshold_px.is_finite() && self.nav.scrolled_threshold_px >= 0.0) {
            return Err(invalid("nav.scrolled_threshold_px", "must be a non-negative number"));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { key, reason: reason.into() }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! `mailto:` handoff used when the primary delivery path fails.

#[cfg(test)]
#[path = "fallback_test.rs"]
mod fallback_test;

/// Build `mailto:<recipient>?subject=..&body=..` with percent-encoded parts.
///
/// The body layout is `Name: ..\nEmail: ..\n\nMessage:\n..`.
#[must_use]
pub fn mailto_uri(recipient: &str, subject_prefix: &str, name: &str, email: &str, message: &str) -> String {
    let subject = format!("{subject_prefix} {name}");
    let body = format!("Name: {name}\nEmail: {email}\n\nMessage:\n{message}");
    format!(
        "mailto:{recipient}?subject={}&body={}",
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    )
}

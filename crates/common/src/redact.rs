//! Log redaction helpers.
//!
//! Anything user-identifying goes through these before it reaches `tracing`.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    // Pattern is a compile-time constant; a failure here is a programmer error.
    #[allow(clippy::unwrap_used)]
    let re = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
    re
});

/// Mask email addresses embedded in free text.
#[must_use]
pub fn redact_text(text: &str) -> String {
    EMAIL_RE.replace_all(text, "[redacted-email]").into_owned()
}

/// Truncate an identifier for logging.
///
/// Keeps a short prefix so log lines stay correlatable without exposing the
/// full identifier.
#[must_use]
pub fn redact_id(id: &str) -> String {
    let prefix: String = id.chars().take(4).collect();
    if prefix.chars().count() < id.chars().count() {
        format!("{prefix}\u{2026}")
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_email() {
        let text = "reported by alice@example.com yesterday";
        assert_eq!(redact_text(text), "reported by [redacted-email] yesterday");
    }

    #[test]
    fn test_redact_plain_text_unchanged() {
        assert_eq!(redact_text("no pii here"), "no pii here");
    }

    #[test]
    fn test_redact_id_truncates() {
        assert_eq!(redact_id("01h2xcejqtf2nbrexx3vqjhp41"), "01h2\u{2026}");
        assert_eq!(redact_id("u1"), "u1");
    }
}

//! Transcript redaction
//!
//! Blanks Basic credentials, card numbers and CVCs in logged request and
//! response text. Everything else is left byte-for-byte intact.

use once_cell::sync::Lazy;
use regex::Regex;

const FILTERED: &str = "[FILTERED]";

static BASIC_AUTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Authorization: Basic )[A-Za-z0-9+/=]+").expect("valid regex"));

// Keys may be backslash-escaped when the JSON body is itself embedded in a string.
static CARD_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)("number\\?":\\?")[^"\\]*"#).expect("valid regex"));

static CVC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)("cvc\\?":\\?")[^"\\]*"#).expect("valid regex"));

/// Whether [`scrub`] is available for this gateway
pub fn supports_scrubbing() -> bool {
    true
}

/// Redact secrets from a transcript
pub fn scrub(transcript: &str) -> String {
    let replacement = format!("${{1}}{}", FILTERED);
    let transcript = BASIC_AUTH.replace_all(transcript, replacement.as_str());
    let transcript = CARD_NUMBER.replace_all(&transcript, replacement.as_str());
    CVC.replace_all(&transcript, replacement.as_str()).into_owned()
}

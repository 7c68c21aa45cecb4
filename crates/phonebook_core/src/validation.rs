//! Field-level validators.
//!
//! # Responsibility
//! - Validate phone number text against the accepted phone grammar.
//!
//! # Invariants
//! - Validators are pure and never panic on arbitrary input.

use once_cell::sync::Lazy;
use regex::Regex;

// Optional `+`, then either
// - `(ddd)` area code, 3 digits, 3 digits, 4-6 digits; or
// - 0-3 digit country code, area code (bare or `(ddd)`), 3 digits, 4-6 digits.
// Digit groups after the area code may be split by one of space, dot or hyphen.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^\+?(?:",
        r"\(\d{3}\)\d{3}[ .-]?\d{3}[ .-]?\d{4,6}",
        r"|\d{0,3}(?:\(\d{3}\)|\d{3})[ .-]?\d{3}[ .-]?\d{4,6}",
        r")$"
    ))
    .expect("valid phone regex")
});

/// Returns whether `text` is an accepted phone number.
///
/// Empty text is rejected. Surrounding whitespace is not trimmed.
pub fn is_valid_phone(text: &str) -> bool {
    PHONE_RE.is_match(text)
}

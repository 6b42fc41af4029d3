//! Mobile number normalization.
//!
//! Customers are keyed by mobile number and job cards are linked to
//! customers by it, so every mobile is normalized before it is stored or
//! compared.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Optional leading `+`, then 7 to 15 digits (E.164 upper bound).
static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("mobile pattern is valid"));

/// Strip the separators people type into phone numbers.
fn strip_separators(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

/// Normalize a mobile number, rejecting anything that is not a phone number.
pub fn normalize_mobile(raw: &str) -> Result<String, CoreError> {
    let stripped = strip_separators(raw);
    if MOBILE_PATTERN.is_match(&stripped) {
        Ok(stripped)
    } else {
        Err(CoreError::Validation(format!(
            "Invalid mobile number '{}'. Expected 7 to 15 digits, optionally prefixed with '+'",
            raw.trim()
        )))
    }
}

//! Field validation shared by the job card, customer and user handlers.

use crate::error::CoreError;
use crate::types::{DbId, Money};

/// Maximum length of short text fields (names, models, usernames).
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of free-text fields (complaints, addresses).
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Maximum length of a national ID number.
pub const MAX_NATIONAL_ID_LENGTH: usize = 32;

/// Upper bound for any single monetary amount, in minor units.
pub const MAX_AMOUNT: Money = 100_000_000;

/// Minimum operator password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Trim a required text field and check it is non-empty and within `max_len` characters.
pub fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    check_length(field, trimmed, max_len)?;
    Ok(trimmed.to_string())
}

/// Trim an optional text field. Blank values become `None`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, CoreError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => {
            check_length(field, v, max_len)?;
            Ok(Some(v.to_string()))
        }
        None => Ok(None),
    }
}

fn check_length(field: &str, value: &str, max_len: usize) -> Result<(), CoreError> {
    if value.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// Check that a monetary amount is within `0..=MAX_AMOUNT`.
pub fn validate_amount(field: &str, amount: Money) -> Result<(), CoreError> {
    if !(0..=MAX_AMOUNT).contains(&amount) {
        return Err(CoreError::Validation(format!(
            "{field} must be between 0 and {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

/// Validate that a password meets minimum strength requirements.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), CoreError> {
    if password.chars().count() < min_length {
        return Err(CoreError::Validation(format!(
            "Password must be at least {min_length} characters long"
        )));
    }
    Ok(())
}

/// Parse a path identifier. Anything other than a positive integer is rejected.
pub fn parse_id(entity: &str, raw: &str) -> Result<DbId, CoreError> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::Validation(format!("Invalid {entity} id '{raw}'"))),
    }
}

//! # Validation Utilities
//!
//! Form input validation helpers. All of them return the user-facing message
//! as the error so callers can push it straight into a notification.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate maximum length in bytes (on-chain metadata fields are byte-limited).
pub fn validate_max_length(value: &str, max: usize, field_name: &str) -> Result<(), String> {
    if value.len() > max {
        Err(format!("{} must be at most {} characters", field_name, max))
    } else {
        Ok(())
    }
}

/// Validate a non-negative decimal number such as `"12"`, `"1.5"` or `".25"`.
pub fn validate_decimal(value: &str, field_name: &str) -> Result<(), String> {
    let value = value.trim();
    let mut parts = value.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        return Err(format!("{} must be a positive decimal number", field_name));
    }
    Ok(())
}

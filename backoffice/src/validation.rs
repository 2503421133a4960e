//! Input validation helpers
//!
//! Centralized text length constants and validation functions for the
//! admin CRUD handlers.

use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, customer, discount, preset
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, SKU, discount code, payment method
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 8;

/// URLs
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Amount limits ───────────────────────────────────────────────────

/// Largest money amount accepted on input
pub const MAX_AMOUNT: f64 = 1e12;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::field_error(
            ErrorCode::RequiredField,
            field,
            format!("{field} must not be empty"),
        ));
    }
    if value.len() > max_len {
        return Err(AppError::field_error(
            ErrorCode::ValidationFailed,
            field,
            format!("{field} is too long ({} chars, max {max_len})", value.len()),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::field_error(
            ErrorCode::ValidationFailed,
            field,
            format!("{field} is too long ({} chars, max {max_len})", v.len()),
        ));
    }
    Ok(())
}

/// Validate an optional email: within limits and containing `@`.
pub fn validate_optional_email(value: &Option<String>) -> Result<(), AppError> {
    validate_optional_text(value, "email", MAX_EMAIL_LEN)?;
    if let Some(v) = value
        && !v.trim().is_empty()
        && !v.contains('@')
    {
        return Err(AppError::field_error(
            ErrorCode::InvalidFormat,
            "email",
            "email must contain '@'",
        ));
    }
    Ok(())
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Money amounts must be finite and within `[0, MAX_AMOUNT]`.
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && (0.0..=MAX_AMOUNT).contains(&value)
}

pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !is_valid_amount(value) {
        return Err(AppError::field_error(
            ErrorCode::ValueOutOfRange,
            field,
            format!("{field} must be an amount between 0 and {MAX_AMOUNT}"),
        ));
    }
    Ok(())
}

/// Percentages must lie in `[0, 100]`.
pub fn validate_percentage(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AppError::field_error(
            ErrorCode::ValueOutOfRange,
            field,
            format!("{field} must be between 0 and 100"),
        ));
    }
    Ok(())
}

/// Trim a value and drop it when blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Mugs", "name", MAX_NAME_LEN).is_ok());
        assert_eq!(
            validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err().code,
            ErrorCode::RequiredField
        );
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_required_text(&long, "name", MAX_NAME_LEN).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", 5).is_ok());
        assert!(validate_optional_text(&Some("12345".into()), "note", 5).is_ok());
        assert!(validate_optional_text(&Some("123456".into()), "note", 5).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_optional_email(&None).is_ok());
        assert!(validate_optional_email(&Some("a@b.co".into())).is_ok());
        assert_eq!(
            validate_optional_email(&Some("nobody".into())).unwrap_err().code,
            ErrorCode::InvalidFormat
        );
    }

    #[test]
    fn test_amounts_and_percentages() {
        assert!(validate_amount(0.0, "price").is_ok());
        assert!(validate_amount(-0.01, "price").is_err());
        assert!(validate_amount(f64::NAN, "price").is_err());
        assert!(validate_amount(MAX_AMOUNT, "price").is_ok());
        assert_eq!(
            validate_amount(1e28, "price").unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
        assert!(validate_percentage(100.0, "margin").is_ok());
        assert!(validate_percentage(100.5, "margin").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ".into())), Some("x".into()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }
}

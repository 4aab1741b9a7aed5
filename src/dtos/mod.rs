//! Request bodies. Every field is optional at the serde level so that an
//! absent field is reported as a missing field rather than a parse failure.

pub mod bill;
pub mod invoice;
pub mod item;
pub mod partner;
pub mod unit;
pub mod vat_rate;

use crate::error::AppError;

pub fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::missing_field(field))
}

/// Present and not blank; returns the trimmed text.
pub fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    let value = required(value, field)?;
    non_blank(value, field)
}

pub fn non_blank(value: String, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid(format!("'{field}' is a required field")));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional free-text field, treating blank as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_missing_and_blank_is_invalid() {
        assert!(matches!(required_text(None, "partner_name"), Err(AppError::MissingField(_))));
        assert!(matches!(
            required_text(Some("   ".into()), "partner_name"),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(required_text(Some(" Acme ".into()), "partner_name").unwrap(), "Acme");
    }

    #[test]
    fn blank_optional_text_is_dropped() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" Ana ".into())), Some("Ana".into()));
    }
}

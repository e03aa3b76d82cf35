//! Input validation utilities
//!
//! Custom validators shared by the request body types.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Phone numbers: optional +country prefix, 7-15 digits
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").unwrap());

/// District names: letters with spaces, dots or hyphens
static DISTRICT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z .-]*$").unwrap());

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message("Phone must be 7-15 digits with an optional + prefix".into()))
    }
}

pub fn validate_district(district: &str) -> Result<(), ValidationError> {
    if !district.is_empty() && district.len() <= 100 && DISTRICT_REGEX.is_match(district) {
        Ok(())
    } else {
        Err(ValidationError::new("district")
            .with_message("District must be letters with spaces, dots or hyphens".into()))
    }
}

/// Person or hospital names must have non-whitespace content
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if !trimmed.is_empty() && trimmed.len() <= 150 {
        Ok(())
    } else {
        Err(ValidationError::new("name").with_message("Name must not be blank".into()))
    }
}

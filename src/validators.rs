/// Input validators for credential payloads.
/// Shape checks only: length limits guard against oversized inputs, the
/// login character class keeps identifiers store-safe, and the password
/// rules require minimal complexity before hashing.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MIN_LOGIN_LENGTH: usize = 3;
const MAX_LOGIN_LENGTH: usize = 64;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

lazy_static! {
    // Logins are opaque identifiers, not necessarily emails
    static ref LOGIN_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap();
}

/// Validates a login identifier
/// - Trims surrounding whitespace
/// - Checks length constraints (3-64 characters)
/// - Restricts to alphanumerics plus `_`, `.`, `-`
pub fn is_valid_login(login: &str) -> Result<String, ValidationError> {
    let trimmed = login.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("login".to_string()));
    }

    if trimmed.len() < MIN_LOGIN_LENGTH {
        return Err(ValidationError::TooShort(
            "login".to_string(),
            MIN_LOGIN_LENGTH,
        ));
    }

    if trimmed.len() > MAX_LOGIN_LENGTH {
        return Err(ValidationError::TooLong(
            "login".to_string(),
            MAX_LOGIN_LENGTH,
        ));
    }

    if trimmed.contains('\0') || trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::SuspiciousContent("login".to_string()));
    }

    if !LOGIN_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat(
            "login may only contain alphanumeric characters, underscores, dots, and hyphens"
                .to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Validates password complexity
///
/// Requirements:
/// - 8 to 128 characters
/// - At least one digit
/// - At least one lowercase letter
/// - At least one uppercase letter
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        ));
    }

    // Upper bound keeps the bcrypt input bounded
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        ));
    }

    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());

    if !has_digit || !has_lowercase || !has_uppercase {
        return Err(ValidationError::InvalidFormat(
            "password must contain at least one digit, one lowercase letter, and one uppercase letter"
                .to_string(),
        ));
    }

    Ok(())
}

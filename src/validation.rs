//! Pure input predicates shared by request models.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles"));

const MIN_PASSWORD_LEN: usize = 8;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// At least 8 bytes with an upper-case letter, a lower-case letter and a digit.
/// The input is not trimmed.
pub fn is_valid_password(password: &str) -> bool {
    if password.len() < MIN_PASSWORD_LEN {
        return false;
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    has_upper && has_lower && has_digit
}

/// Length is measured in bytes after trimming, like the password rule.
pub fn is_valid_string_length(value: &str, min: usize, max: usize) -> bool {
    let length = value.trim().len();
    length >= min && length <= max
}

pub fn is_required(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message(Cow::Borrowed("Invalid email format")))
    }
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if is_valid_password(password) {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(Cow::Borrowed(
            "Password must be at least 8 characters and contain upper-case, lower-case and numeric characters",
        )))
    }
}

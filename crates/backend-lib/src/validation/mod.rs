// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for resolver arguments.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_TITLE_LENGTH: usize = 200;
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Your passwords don't match")]
    PasswordMismatch,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trim and lower-case an email, then check its shape
pub fn normalize_email(email: &str) -> ValidationResult<String> {
    let email = email.trim().to_lowercase();

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(&email) {
        return Err(ValidationError::InvalidEmail(
            "Email address is not well formed".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a password
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password must not be empty".to_string(),
        ));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password cannot exceed {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(password)
}

/// Check a new password against its confirmation
pub fn validate_password_confirmation(password: &str, confirm: &str) -> ValidationResult<()> {
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> ValidationResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidName(format!(
            "Name must be between 1 and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate an item title
pub fn validate_title(title: &str) -> ValidationResult<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::InvalidItem(format!(
            "Title must be between 1 and {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate an item price (cents)
pub fn validate_price(price: i32) -> ValidationResult<i32> {
    if price < 0 {
        return Err(ValidationError::InvalidItem(
            "Price cannot be negative".to_string(),
        ));
    }
    Ok(price)
}

//! Input validation for Fileshelf registration.

use thiserror::Error;
use validator::ValidateEmail;

use super::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::ShelfError;

/// Maximum display name length (characters, after trimming).
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid email format")]
    EmailInvalidFormat,

    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    #[error("display name cannot be empty")]
    DisplayNameEmpty,

    #[error("display name must be at most {MAX_DISPLAY_NAME_LENGTH} characters")]
    DisplayNameTooLong,

    #[error("display name contains invalid characters")]
    DisplayNameInvalidChars,
}

impl From<ValidationError> for ShelfError {
    fn from(e: ValidationError) -> Self {
        ShelfError::InvalidInput(e.to_string())
    }
}

/// Validate an email address.
///
/// # Examples
///
/// ```
/// use fileshelf::auth::validation::validate_email;
///
/// assert!(validate_email("a@x.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if !email.validate_email() {
        return Err(ValidationError::EmailInvalidFormat);
    }
    Ok(())
}

/// Validate a registration password (8-128 characters).
pub fn validate_registration_password(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

/// Validate a display name.
///
/// Requirements:
/// - Not blank
/// - At most 100 characters after trimming
/// - No control characters
pub fn validate_display_name(display_name: &str) -> Result<(), ValidationError> {
    let trimmed = display_name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::DisplayNameEmpty);
    }
    if trimmed.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(ValidationError::DisplayNameTooLong);
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::DisplayNameInvalidChars);
    }

    Ok(())
}

/// Validate all registration fields.
pub fn validate_registration(
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_registration_password(password)?;
    validate_display_name(display_name)?;
    Ok(())
}

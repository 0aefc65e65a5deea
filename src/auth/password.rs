//! Password hashing for Fileshelf.
//!
//! Argon2id with a random per-password salt, stored as a PHC string.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

use crate::ShelfError;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Stored hash is not a valid PHC string.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Wrong password.
    #[error("password verification failed")]
    VerificationFailed,
}

impl From<PasswordError> for ShelfError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooShort | PasswordError::TooLong => {
                ShelfError::InvalidInput(e.to_string())
            }
            PasswordError::VerificationFailed | PasswordError::InvalidHash => {
                ShelfError::Unauthenticated("invalid email or password".to_string())
            }
            PasswordError::HashError(msg) => ShelfError::Internal(msg),
        }
    }
}

/// Argon2id hasher (19 MiB memory, 2 iterations, 1 lane).
fn create_argon2() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(19 * 1024, 2, 1, None)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password using Argon2id.
///
/// # Examples
///
/// ```
/// use fileshelf::auth::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// The Argon2 parameters are read from the stored hash itself.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Check the password length bounds (8..=128 characters).
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}

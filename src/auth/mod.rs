//! Authentication module for Fileshelf.
//!
//! This module provides password hashing, bearer tokens, registration and
//! login, and the permission checks used before uploads and deletions.

mod password;
mod permission;
mod service;
mod token;
pub mod validation;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use permission::{require_owner, require_upload, PermissionError};
pub use service::{AuthOutcome, AuthService, RegistrationRequest};
pub use token::{TokenClaims, TokenCodec};
pub use validation::ValidationError;

//! Fileshelf - a file upload, search and download service.
//!
//! Registered identities upload files into a path-safe blob store, search
//! them by title, filename and description, and download them over HTTP.
//! Uploading requires a capability granted by an administrator; only the
//! uploader may delete a file.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{
    hash_password, require_owner, require_upload, validate_password, verify_password,
    AuthOutcome, AuthService, PasswordError, PermissionError, RegistrationRequest, TokenClaims,
    TokenCodec, ValidationError,
};
pub use config::Config;
pub use db::{Database, Identity, IdentityRepository, NewIdentity};
pub use error::{Result, ShelfError};
pub use file::{
    BlobStore, FileCategory, FileQuery, FileRecord, FileRepository, FileService, NewUpload,
    SearchEngine,
};
pub use web::WebServer;

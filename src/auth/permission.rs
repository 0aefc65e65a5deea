//! Authorization checks for Fileshelf.
//!
//! Checks are plain functions evaluated against an identity freshly loaded
//! from the credential store, never against the claims embedded in a token.

use thiserror::Error;

use crate::db::Identity;
use crate::file::FileRecord;
use crate::ShelfError;

/// Permission-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The identity lacks the upload capability.
    #[error("upload capability required")]
    UploadNotAllowed,

    /// The identity does not own the resource.
    #[error("only the uploader can delete this file")]
    NotOwner,
}

impl From<PermissionError> for ShelfError {
    fn from(e: PermissionError) -> Self {
        ShelfError::Forbidden(e.to_string())
    }
}

/// Require the upload capability.
pub fn require_upload(identity: &Identity) -> Result<(), PermissionError> {
    if identity.can_upload {
        Ok(())
    } else {
        Err(PermissionError::UploadNotAllowed)
    }
}

/// Require that `requester_id` uploaded `file`.
pub fn require_owner(file: &FileRecord, requester_id: i64) -> Result<(), PermissionError> {
    if file.uploaded_by == requester_id {
        Ok(())
    } else {
        Err(PermissionError::NotOwner)
    }
}

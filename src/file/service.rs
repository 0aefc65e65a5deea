//! File service for Fileshelf.
//!
//! Ties the blob store and the record repository together:
//! - Upload: hash, store, classify, describe, persist
//! - Lookup and download
//! - Owner-only deletion

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::auth::require_owner;
use crate::db::{Database, Identity};
use crate::{Result, ShelfError};

use super::category::{classify, describe, is_code_filename, FileCategory};
use super::metadata::{FileRecord, FileRepository, NewFileRecord};
use super::storage::BlobStore;

/// Filename recorded when the client sends none.
pub const UNNAMED_FILE: &str = "unnamed";

/// Content type that says nothing about the content.
const GENERIC_CONTENT_TYPE: &str = "application/octet-stream";

/// Default maximum upload size (100 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// An uploaded file before it is stored.
#[derive(Debug, Clone, Default)]
pub struct NewUpload {
    /// Original filename.
    pub filename: String,
    pub content: Vec<u8>,
    /// Client-declared content type.
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub category: Option<FileCategory>,
    pub metadata_text: Option<String>,
}

impl NewUpload {
    /// Create an upload with only a filename and content.
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
            ..Self::default()
        }
    }
}

/// A record together with its content.
#[derive(Debug)]
pub struct Download {
    pub record: FileRecord,
    pub content: Vec<u8>,
}

/// File service for uploads, downloads and deletion.
pub struct FileService<'a> {
    db: &'a Database,
    storage: &'a BlobStore,
    max_upload_bytes: u64,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(db: &'a Database, storage: &'a BlobStore) -> Self {
        Self {
            db,
            storage,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Create a new FileService with a custom max upload size.
    pub fn with_max_upload_bytes(mut self, max_bytes: u64) -> Self {
        self.max_upload_bytes = max_bytes;
        self
    }

    /// Store an upload and persist its record.
    ///
    /// The caller is responsible for the upload capability check against a
    /// freshly loaded identity. The blob is written before the record; if
    /// persisting the record fails the blob is left behind.
    pub async fn upload(&self, uploader: &Identity, upload: NewUpload) -> Result<FileRecord> {
        if upload.content.is_empty() {
            return Err(ShelfError::InvalidInput("file is empty".to_string()));
        }

        let size = upload.content.len() as u64;
        if size > self.max_upload_bytes {
            let max_mb = self.max_upload_bytes / 1024 / 1024;
            return Err(ShelfError::InvalidInput(format!(
                "file is too large (max {max_mb} MB)"
            )));
        }

        let filename = non_blank(Some(upload.filename))
            .unwrap_or_else(|| UNNAMED_FILE.to_string());
        let content_type = effective_content_type(upload.content_type, &filename);
        let content_hash = content_hash(&upload.content);

        let storage_path = self.storage.store(&upload.content, &filename).await?;

        let category = upload
            .category
            .unwrap_or_else(|| classify(content_type.as_deref(), &filename));
        let title = non_blank(upload.title).unwrap_or_else(|| filename.clone());
        let metadata_text = non_blank(upload.metadata_text).unwrap_or_else(|| {
            describe(&filename, category, content_type.as_deref(), size as i64)
        });

        let new_record = NewFileRecord {
            title,
            filename,
            category,
            uploaded_by: uploader.id,
            file_size_bytes: size as i64,
            metadata_text,
            content_type,
            storage_path,
            content_hash,
        };

        let record = match FileRepository::new(self.db.pool()).create(&new_record).await {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    storage_path = %new_record.storage_path,
                    error = %e,
                    "File record not persisted, blob left in storage"
                );
                return Err(e);
            }
        };

        info!(
            file_id = %record.id,
            uploader_id = uploader.id,
            category = %record.category,
            bytes = record.file_size_bytes,
            "File uploaded"
        );

        Ok(record)
    }

    /// Get a file record.
    pub async fn get(&self, file_id: &str) -> Result<FileRecord> {
        FileRepository::new(self.db.pool())
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("file".to_string()))
    }

    /// Get a file record and its content.
    pub async fn download(&self, file_id: &str) -> Result<Download> {
        let record = self.get(file_id).await?;
        let content = self.storage.load(&record.storage_path).await?;
        Ok(Download { record, content })
    }

    /// Delete a file. Only its uploader may do so.
    ///
    /// The blob goes first, then the record. The ownership check and the
    /// deletion are not atomic.
    pub async fn delete(&self, file_id: &str, requester_id: i64) -> Result<()> {
        let record = self.get(file_id).await?;

        if let Err(e) = require_owner(&record, requester_id) {
            warn!(file_id = %file_id, requester_id, "Rejected delete by non-owner");
            return Err(e.into());
        }

        self.storage.delete(&record.storage_path).await?;
        FileRepository::new(self.db.pool()).delete(file_id).await?;

        info!(file_id = %file_id, requester_id, "File deleted");
        Ok(())
    }
}

/// SHA-256 of `content` as lowercase hex.
pub fn content_hash(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

/// The declared content type, or a guess from the filename when the
/// declared one is missing or generic.
///
/// Source files get no guess: registry types for code extensions are
/// unreliable (`.ts` is MPEG transport stream) and the extension alone
/// classifies them.
fn effective_content_type(declared: Option<String>, filename: &str) -> Option<String> {
    match non_blank(declared) {
        Some(ct) if !ct.eq_ignore_ascii_case(GENERIC_CONTENT_TYPE) => Some(ct),
        declared if is_code_filename(filename) => declared,
        declared => mime_guess::from_path(filename)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .or(declared),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! API handlers for the HTTP API.

pub mod auth;
pub mod file;
pub mod search;

pub use auth::*;
pub use file::*;
pub use search::*;

use std::collections::HashMap;

use crate::auth::AuthService;
use crate::db::{Database, IdentityRepository};
use crate::file::{BlobStore, FileRecord, FileService};
use crate::web::dto::FileResponse;
use crate::web::error::ApiError;

/// Display name shown when an uploader no longer resolves.
pub const UNKNOWN_UPLOADER: &str = "Unknown User";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthService,
    pub storage: BlobStore,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, auth: AuthService, storage: BlobStore, max_upload_bytes: u64) -> Self {
        Self {
            db,
            auth,
            storage,
            max_upload_bytes,
        }
    }

    /// File service bound to this state's database and blob store.
    pub fn files(&self) -> FileService<'_> {
        FileService::new(&self.db, &self.storage).with_max_upload_bytes(self.max_upload_bytes)
    }
}

/// Convert records into responses, resolving each distinct uploader once.
pub async fn file_responses(
    state: &AppState,
    records: Vec<FileRecord>,
) -> Result<Vec<FileResponse>, ApiError> {
    let repo = IdentityRepository::new(state.db.pool());
    let mut names: HashMap<i64, String> = HashMap::new();

    for record in &records {
        if names.contains_key(&record.uploaded_by) {
            continue;
        }
        let name = repo
            .get_by_id(record.uploaded_by)
            .await?
            .map(|identity| identity.display_name)
            .unwrap_or_else(|| UNKNOWN_UPLOADER.to_string());
        names.insert(record.uploaded_by, name);
    }

    Ok(records
        .into_iter()
        .map(|record| {
            let name = names
                .get(&record.uploaded_by)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_UPLOADER.to_string());
            FileResponse::from_record(record, name)
        })
        .collect())
}

/// Convert a single record into a response.
pub async fn file_response(state: &AppState, record: FileRecord) -> Result<FileResponse, ApiError> {
    let mut responses = file_responses(state, vec![record]).await?;
    responses
        .pop()
        .ok_or_else(|| ApiError::internal("An internal error occurred"))
}

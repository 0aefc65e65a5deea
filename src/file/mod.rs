//! File management module for Fileshelf.
//!
//! This module provides:
//! - Path-safe blob storage with sharded UUID paths
//! - File records, classification and searchable descriptions
//! - Search and autocomplete over records
//! - The upload/download/delete service

mod category;
mod metadata;
mod query;
mod search;
mod service;
mod storage;

pub use category::{classify, describe, FileCategory, LARGE_FILE_BYTES, SMALL_FILE_BYTES};
pub use metadata::{FileRecord, FileRepository, NewFileRecord};
pub use query::{page_window, FileQuery, SortDirection, SortField, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use search::{SearchEngine, SearchPage, MAX_SUGGESTIONS, SUGGEST_SCAN_LIMIT};
pub use service::{
    content_hash, Download, FileService, NewUpload, DEFAULT_MAX_UPLOAD_BYTES, UNNAMED_FILE,
};
pub use storage::BlobStore;

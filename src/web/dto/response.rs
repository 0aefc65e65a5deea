//! Response DTOs for Web API.

use serde::Serialize;

use crate::auth::AuthOutcome;
use crate::db::Identity;
use crate::file::{FileCategory, FileRecord};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Response data.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
            },
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number, starting at 1.
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
    /// Total number of matching items.
    pub total: i64,
}

// ============================================================================
// Auth DTOs
// ============================================================================

/// Login and registration response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Access token (JWT).
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

impl From<AuthOutcome> for AuthResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            access_token: outcome.token,
            token_type: "Bearer",
            expires_in: outcome.expires_in,
            user: UserInfo::from(&outcome.identity),
        }
    }
}

/// Identity information in responses. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub can_upload: bool,
}

impl From<&Identity> for UserInfo {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            can_upload: identity.can_upload,
        }
    }
}

// ============================================================================
// File DTOs
// ============================================================================

/// File metadata response.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: String,
    pub title: String,
    pub filename: String,
    pub category: FileCategory,
    /// RFC 3339 upload timestamp.
    pub uploaded_at: String,
    /// Uploader identity id.
    pub uploaded_by: i64,
    pub uploader_name: String,
    pub file_size_bytes: i64,
    pub metadata_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content_hash: String,
    /// Relative URL the content can be fetched from.
    pub download_url: String,
}

impl FileResponse {
    /// Build a response from a stored record and the uploader's display name.
    pub fn from_record(record: FileRecord, uploader_name: impl Into<String>) -> Self {
        let download_url = format!("/api/files/{}/download", record.id);
        Self {
            uploaded_at: record.uploaded_at.to_rfc3339(),
            download_url,
            id: record.id,
            title: record.title,
            filename: record.filename,
            category: record.category,
            uploaded_by: record.uploaded_by,
            uploader_name: uploader_name.into(),
            file_size_bytes: record.file_size_bytes,
            metadata_text: record.metadata_text,
            content_type: record.content_type,
            content_hash: record.content_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record() -> FileRecord {
        FileRecord {
            id: "abc-123".to_string(),
            title: "Report".to_string(),
            filename: "report.pdf".to_string(),
            category: FileCategory::Document,
            uploaded_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            uploaded_by: 7,
            file_size_bytes: 1024,
            metadata_text: "report document".to_string(),
            content_type: Some("application/pdf".to_string()),
            storage_path: "ab/cd/abc-report.pdf".to_string(),
            content_hash: "deadbeef".to_string(),
        }
    }

    #[test]
    fn test_file_response_shape() {
        let response = FileResponse::from_record(record(), "Alice");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], "abc-123");
        assert_eq!(json["category"], "DOCUMENT");
        assert_eq!(json["uploader_name"], "Alice");
        assert_eq!(json["download_url"], "/api/files/abc-123/download");
        assert_eq!(json["uploaded_at"], "2024-05-01T12:00:00+00:00");
        assert!(json.get("storage_path").is_none());
    }

    #[test]
    fn test_file_response_omits_missing_content_type() {
        let mut record = record();
        record.content_type = None;
        let json = serde_json::to_value(FileResponse::from_record(record, "Alice")).unwrap();
        assert!(json.get("content_type").is_none());
    }

    #[test]
    fn test_user_info_has_no_password_hash() {
        let identity = Identity {
            id: 1,
            email: "a@x.com".to_string(),
            display_name: "A".to_string(),
            password_hash: "secret-hash".to_string(),
            can_upload: true,
            created_at: "2024-01-01 00:00:00".to_string(),
        };
        let json = serde_json::to_value(UserInfo::from(&identity)).unwrap();
        assert_eq!(json["can_upload"], true);
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_paginated_response() {
        let response = PaginatedResponse::new(vec![1, 2], 2, 2, 5);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["meta"]["page"], 2);
        assert_eq!(json["meta"]["total"], 5);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}

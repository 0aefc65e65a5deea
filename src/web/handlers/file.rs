//! File handlers for the HTTP API.

use axum::{
    body::Body,
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::auth::require_upload;
use crate::file::{FileCategory, NewUpload};
use crate::web::dto::{ApiResponse, FileResponse};
use crate::web::error::ApiError;
use crate::web::handlers::{caller_identity, file_response, AppState};
use crate::web::middleware::AuthUser;
use crate::ShelfError;

/// Generate a safe Content-Disposition header value for file downloads.
///
/// This function sanitizes the filename to prevent header injection attacks
/// and uses RFC 5987 encoding for non-ASCII filenames.
///
/// # Security
///
/// The function:
/// - Removes control characters (including CR, LF which could cause header injection)
/// - Escapes double quotes and backslashes
/// - Uses RFC 5987 filename* parameter for proper Unicode support
fn content_disposition_header(filename: &str) -> String {
    // Sanitize filename for the basic filename parameter (ASCII fallback)
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control()) // Remove control characters (CR, LF, etc.)
        .map(|c| match c {
            '"' => '_',  // Replace double quotes
            '\\' => '_', // Replace backslashes
            _ => c,
        })
        .collect();

    // For ASCII-only filenames, use simple format
    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    // Use RFC 5987 encoding for non-ASCII or special characters
    // filename* parameter with UTF-8 encoding
    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Upload exceeds the maximum allowed size")
    } else {
        tracing::warn!("Failed to read multipart data: {}", err);
        ApiError::bad_request("Invalid multipart data")
    }
}

async fn field_text(field: Field<'_>) -> Result<Option<String>, ApiError> {
    let text = field.text().await.map_err(multipart_error)?;
    Ok((!text.trim().is_empty()).then_some(text))
}

/// POST /api/files/upload - Upload a file.
///
/// Request body: multipart/form-data with a required "file" field and
/// optional "title", "category" and "metadata_text" fields.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponse>>), ApiError> {
    // Capability comes from the store, not the token, and is checked before
    // the body is read.
    let identity = caller_identity(&state, &claims).await?;
    require_upload(&identity).map_err(ShelfError::from)?;

    let mut upload: Option<NewUpload> = None;
    let mut title: Option<String> = None;
    let mut category: Option<FileCategory> = None;
    let mut metadata_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let content = field.bytes().await.map_err(multipart_error)?.to_vec();
                let mut new_upload = NewUpload::new(filename, content);
                new_upload.content_type = content_type;
                upload = Some(new_upload);
            }
            "title" => title = field_text(field).await?,
            "category" => {
                category = match field_text(field).await? {
                    Some(value) => Some(value.trim().parse::<FileCategory>()?),
                    None => None,
                };
            }
            "metadata_text" | "metadataText" => metadata_text = field_text(field).await?,
            _ => {}
        }
    }

    let mut upload = upload.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    upload.title = title;
    upload.category = category;
    upload.metadata_text = metadata_text;

    let record = state.files().upload(&identity, upload).await?;
    info!(file_id = %record.id, identity_id = identity.id, "File uploaded via API");

    let response = file_response(&state, record).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// GET /api/files/:id - File metadata.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let record = state.files().get(&file_id).await?;
    let response = file_response(&state, record).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// GET /api/files/:id/download - File content.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Response, ApiError> {
    let download = state.files().download(&file_id).await?;
    let record = download.record;

    let content_type = record.content_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&record.filename)
            .first_or_octet_stream()
            .to_string()
    });

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&record.filename),
        )
        .header(header::CONTENT_LENGTH, download.content.len())
        .body(Body::from(download.content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// DELETE /api/files/:id - Delete a file. Only the uploader may delete.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.files().delete(&file_id, claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! File records and their repository.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::category::FileCategory;
use super::query::FileQuery;
use crate::{Result, ShelfError};

const FILE_COLUMNS: &str = "id, title, filename, category, uploaded_at, uploaded_by, \
     file_size_bytes, metadata_text, content_type, storage_path, content_hash";

/// A stored file.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FileRecord {
    /// UUID v4.
    pub id: String,
    pub title: String,
    /// Original filename as uploaded.
    pub filename: String,
    #[sqlx(try_from = "String")]
    pub category: FileCategory,
    pub uploaded_at: DateTime<Utc>,
    /// Identity ID of the uploader.
    pub uploaded_by: i64,
    pub file_size_bytes: i64,
    /// Free text searched alongside title and filename.
    pub metadata_text: String,
    pub content_type: Option<String>,
    /// Blob location relative to the storage root.
    pub storage_path: String,
    /// SHA-256 of the content, lowercase hex.
    pub content_hash: String,
}

/// Data for creating a file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub title: String,
    pub filename: String,
    pub category: FileCategory,
    pub uploaded_by: i64,
    pub file_size_bytes: i64,
    pub metadata_text: String,
    pub content_type: Option<String>,
    pub storage_path: String,
    pub content_hash: String,
}

/// Repository for file records.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a record, assigning its ID and upload time.
    pub async fn create(&self, file: &NewFileRecord) -> Result<FileRecord> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO stored_files (id, title, filename, category, uploaded_at, uploaded_by,
                file_size_bytes, metadata_text, content_type, storage_path, content_hash,
                title_lc, filename_lc, metadata_lc)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&file.title)
        .bind(&file.filename)
        .bind(file.category.as_str())
        .bind(format_timestamp(&Utc::now()))
        .bind(file.uploaded_by)
        .bind(file.file_size_bytes)
        .bind(&file.metadata_text)
        .bind(&file.content_type)
        .bind(&file.storage_path)
        .bind(&file.content_hash)
        .bind(file.title.to_lowercase())
        .bind(file.filename.to_lowercase())
        .bind(file.metadata_text.to_lowercase())
        .execute(self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| ShelfError::NotFound(format!("file {id}")))
    }

    /// Get a record by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM stored_files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(file)
    }

    /// Delete a record. Returns false if it did not exist.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM stored_files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Run a search and return one page of records plus the total match count.
    pub async fn search(&self, query: &FileQuery) -> Result<(Vec<FileRecord>, i64)> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM stored_files");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool).await?;

        let mut select =
            QueryBuilder::<Sqlite>::new(format!("SELECT {FILE_COLUMNS} FROM stored_files"));
        push_filters(&mut select, query);

        // rowid keeps pages stable when the sort column has ties
        let direction = query.direction.as_sql();
        select.push(format!(
            " ORDER BY {} {direction}, rowid {direction}",
            query.sort.column()
        ));
        select.push(" LIMIT ").push_bind(query.limit);
        select.push(" OFFSET ").push_bind(query.offset);

        let files = select
            .build_query_as::<FileRecord>()
            .fetch_all(self.pool)
            .await?;

        Ok((files, total))
    }

    /// Most recent records whose title or filename contains `text` (case-insensitive).
    ///
    /// Matching runs against the `_lc` columns, which hold Rust-lowercased
    /// copies since SQLite's `lower()` only folds ASCII.
    pub async fn find_recent_by_title_or_filename(
        &self,
        text: &str,
        limit: i64,
    ) -> Result<Vec<FileRecord>> {
        let pattern = like_pattern(text);
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM stored_files
             WHERE title_lc LIKE ? ESCAPE '\\' OR filename_lc LIKE ? ESCAPE '\\'
             ORDER BY uploaded_at DESC, rowid DESC
             LIMIT ?"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(files)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &FileQuery) {
    let mut has_where = false;

    if let Some(text) = &query.text {
        let pattern = like_pattern(text);
        builder
            .push(" WHERE (title_lc LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR filename_lc LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR metadata_lc LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
        has_where = true;
    }

    if !query.categories.is_empty() {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("category IN (");
        let mut separated = builder.separated(", ");
        for category in &query.categories {
            separated.push_bind(category.as_str());
        }
        separated.push_unseparated(")");
    }
}

/// `%text%` with LIKE wildcards in `text` escaped, lowercased.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Fixed-width RFC 3339 so stored timestamps sort lexically.
fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

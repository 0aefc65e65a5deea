//! File search and autocomplete.

use sqlx::SqlitePool;
use tracing::debug;

use super::category::FileCategory;
use super::metadata::{FileRecord, FileRepository};
use super::query::FileQuery;
use crate::Result;

/// Records scanned per suggestion request.
pub const SUGGEST_SCAN_LIMIT: i64 = 25;

/// Maximum suggestions returned.
pub const MAX_SUGGESTIONS: usize = 10;

/// One page of search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub files: Vec<FileRecord>,
    /// Matches across all pages.
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// Search over file records.
pub struct SearchEngine<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SearchEngine<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Filtered, sorted, paginated search.
    pub async fn search(&self, query: &FileQuery) -> Result<SearchPage> {
        let (files, total) = FileRepository::new(self.pool).search(query).await?;
        debug!(
            text = ?query.text,
            total,
            returned = files.len(),
            "File search"
        );

        Ok(SearchPage {
            files,
            total,
            offset: query.offset,
            limit: query.limit,
        })
    }

    /// Up to ten distinct titles or filenames containing `text`.
    ///
    /// Only the most recent matches are scanned, so older files may be
    /// missed. A blank query returns nothing without touching the database.
    pub async fn suggest(
        &self,
        text: Option<&str>,
        categories: &[FileCategory],
    ) -> Result<Vec<String>> {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(Vec::new());
        };

        let candidates = FileRepository::new(self.pool)
            .find_recent_by_title_or_filename(text, SUGGEST_SCAN_LIMIT)
            .await?;

        let needle = text.to_lowercase();
        let mut suggestions: Vec<String> = Vec::new();

        for file in candidates {
            if !categories.is_empty() && !categories.contains(&file.category) {
                continue;
            }
            for candidate in [file.title, file.filename] {
                if suggestions.len() >= MAX_SUGGESTIONS {
                    return Ok(suggestions);
                }
                if candidate.to_lowercase().contains(&needle) && !suggestions.contains(&candidate)
                {
                    suggestions.push(candidate);
                }
            }
        }

        Ok(suggestions)
    }
}

//! Store-agnostic description of a file search.

use super::category::FileCategory;

/// Default page size for searches.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Column a search is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Title,
    Filename,
    Category,
    #[default]
    UploadedAt,
    UploadedBy,
    FileSizeBytes,
}

impl SortField {
    /// Parse a sort field name.
    ///
    /// Accepts camelCase and snake_case spellings. Anything unrecognised
    /// (including no value at all) sorts by upload time.
    pub fn from_param(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return SortField::UploadedAt;
        };

        match value.trim().to_ascii_lowercase().replace('_', "").as_str() {
            "title" => SortField::Title,
            "filename" => SortField::Filename,
            "category" => SortField::Category,
            "uploadedat" => SortField::UploadedAt,
            "uploadedby" => SortField::UploadedBy,
            "filesize" | "filesizebytes" => SortField::FileSizeBytes,
            _ => SortField::UploadedAt,
        }
    }

    /// The column this field maps to.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Filename => "filename",
            SortField::Category => "category",
            SortField::UploadedAt => "uploaded_at",
            SortField::UploadedBy => "uploaded_by",
            SortField::FileSizeBytes => "file_size_bytes",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `asc`/`ascending` (any case) sorts ascending; everything else descending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().to_ascii_lowercase().starts_with("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A filtered, sorted, paginated file search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    /// Case-insensitive substring over title, filename and metadata text.
    /// `None` matches everything.
    pub text: Option<String>,
    /// Accepted categories. Empty matches everything.
    pub categories: Vec<FileCategory>,
    pub sort: SortField,
    pub direction: SortDirection,
    /// Rows to skip.
    pub offset: i64,
    /// Maximum rows to return.
    pub limit: i64,
}

impl Default for FileQuery {
    fn default() -> Self {
        Self {
            text: None,
            categories: Vec::new(),
            sort: SortField::UploadedAt,
            direction: SortDirection::Desc,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FileQuery {
    /// Create a query for a 1-based page.
    ///
    /// Pages below 1 are read as 1 and the size is clamped to
    /// `1..=MAX_PAGE_SIZE`.
    pub fn from_page(page: i64, size: i64) -> Self {
        let (offset, limit) = page_window(page, size);
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }

    /// Set the text filter. Blank text is treated as no filter.
    pub fn with_text(mut self, text: Option<impl Into<String>>) -> Self {
        self.text = text
            .map(Into::into)
            .map(|t: String| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    pub fn with_categories(mut self, categories: Vec<FileCategory>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_sort(mut self, sort: SortField, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }
}

/// Translate a 1-based page and page size into `(offset, limit)`.
pub fn page_window(page: i64, size: i64) -> (i64, i64) {
    let page = page.max(1);
    let limit = size.clamp(1, MAX_PAGE_SIZE);
    ((page - 1).saturating_mul(limit), limit)
}

//! File categories and upload-time classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ShelfError;

/// Extensions treated as source code when the content type says nothing.
const CODE_EXTENSIONS: &[&str] = &[
    "rs", "py", "js", "ts", "jsx", "tsx", "java", "kt", "scala", "c", "h", "cpp", "hpp", "cc",
    "cs", "go", "rb", "php", "swift", "sh", "bash", "ps1", "pl", "lua", "r", "sql", "html",
    "css", "scss", "json", "yaml", "yml", "toml", "xml",
];

/// Size below which a file is described as `small`.
pub const SMALL_FILE_BYTES: i64 = 100 * 1024;

/// Size above which a file is described as `large`.
pub const LARGE_FILE_BYTES: i64 = 10 * 1024 * 1024;

/// Category of a stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Code,
    Other,
}

impl FileCategory {
    /// All categories, in display order.
    pub const ALL: [FileCategory; 7] = [
        FileCategory::Image,
        FileCategory::Video,
        FileCategory::Audio,
        FileCategory::Document,
        FileCategory::Archive,
        FileCategory::Code,
        FileCategory::Other,
    ];

    /// Stored and wire representation (`IMAGE`, `CODE`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Image => "IMAGE",
            FileCategory::Video => "VIDEO",
            FileCategory::Audio => "AUDIO",
            FileCategory::Document => "DOCUMENT",
            FileCategory::Archive => "ARCHIVE",
            FileCategory::Code => "CODE",
            FileCategory::Other => "OTHER",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = ShelfError;

    /// Parse a category name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FileCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ShelfError::InvalidInput(format!("unknown category: {wanted}")))
    }
}

impl TryFrom<String> for FileCategory {
    type Error = ShelfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Classify a file from its content type, falling back to the filename extension.
///
/// MIME prefixes win over MIME substrings, which win over the extension.
pub fn classify(content_type: Option<&str>, filename: &str) -> FileCategory {
    let mime = content_type.unwrap_or_default().to_ascii_lowercase();

    if mime.starts_with("image/") {
        return FileCategory::Image;
    }
    if mime.starts_with("video/") {
        return FileCategory::Video;
    }
    if mime.starts_with("audio/") {
        return FileCategory::Audio;
    }

    let contains_any = |needles: &[&str]| needles.iter().any(|n| mime.contains(n));

    if contains_any(&[
        "pdf",
        "word",
        "excel",
        "spreadsheet",
        "presentation",
        "document",
    ]) {
        return FileCategory::Document;
    }
    if contains_any(&["zip", "compress", "archive", "rar", "tar"]) {
        return FileCategory::Archive;
    }

    if is_code_filename(filename) {
        FileCategory::Code
    } else {
        FileCategory::Other
    }
}

/// Whether the filename carries a source-code extension.
pub fn is_code_filename(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| CODE_EXTENSIONS.contains(&ext.as_str()))
}

/// Build the searchable description of a file.
///
/// Joins the filename stem (with `_` and `-` read as spaces), the lowercase
/// category, a keyword phrase derived from the content type and a size class.
pub fn describe(
    filename: &str,
    category: FileCategory,
    content_type: Option<&str>,
    size_bytes: i64,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    let stem = stem(filename).replace(['_', '-'], " ");
    let stem = stem.trim();
    if !stem.is_empty() {
        parts.push(stem.to_string());
    }

    parts.push(category.as_str().to_ascii_lowercase());

    if let Some(phrase) = content_type.and_then(keyword_phrase) {
        parts.push(phrase.to_string());
    }

    if size_bytes < SMALL_FILE_BYTES {
        parts.push("small".to_string());
    } else if size_bytes > LARGE_FILE_BYTES {
        parts.push("large".to_string());
    }

    parts.join(" ")
}

fn keyword_phrase(content_type: &str) -> Option<&'static str> {
    let mime = content_type.to_ascii_lowercase();

    if mime.contains("spreadsheet") || mime.contains("excel") {
        Some("spreadsheet excel data")
    } else if mime.contains("document") || mime.contains("word") {
        Some("document text word")
    } else if mime.contains("pdf") {
        Some("pdf document")
    } else if mime.contains("image") {
        Some("image picture photo")
    } else if mime.contains("video") {
        Some("video movie clip")
    } else if mime.contains("audio") {
        Some("audio sound music")
    } else {
        None
    }
}

fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!("IMAGE".parse::<FileCategory>().unwrap(), FileCategory::Image);
        assert_eq!(" code ".parse::<FileCategory>().unwrap(), FileCategory::Code);
        assert_eq!("document".parse::<FileCategory>().unwrap(), FileCategory::Document);
        assert!(matches!(
            "spreadsheet".parse::<FileCategory>(),
            Err(ShelfError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_category_serde_is_screaming_case() {
        let json = serde_json::to_string(&FileCategory::Archive).unwrap();
        assert_eq!(json, "\"ARCHIVE\"");
        let parsed: FileCategory = serde_json::from_str("\"VIDEO\"").unwrap();
        assert_eq!(parsed, FileCategory::Video);
    }

    #[test]
    fn test_classify_by_mime_prefix() {
        assert_eq!(classify(Some("image/png"), "a.bin"), FileCategory::Image);
        assert_eq!(classify(Some("video/mp4"), "a.rs"), FileCategory::Video);
        assert_eq!(classify(Some("audio/mpeg"), "a"), FileCategory::Audio);
    }

    #[test]
    fn test_classify_by_mime_substring() {
        assert_eq!(classify(Some("application/pdf"), "x"), FileCategory::Document);
        assert_eq!(
            classify(
                Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
                "report.xlsx"
            ),
            FileCategory::Document
        );
        assert_eq!(classify(Some("application/zip"), "x.zip"), FileCategory::Archive);
        assert_eq!(classify(Some("application/x-tar"), "x.tar"), FileCategory::Archive);
    }

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify(None, "script.rs"), FileCategory::Code);
        assert_eq!(classify(Some("text/plain"), "main.PY"), FileCategory::Code);
        assert_eq!(classify(None, "notes.txt"), FileCategory::Other);
        assert_eq!(classify(None, "rs"), FileCategory::Other);
        assert_eq!(classify(None, ".rs"), FileCategory::Other);
    }

    #[test]
    fn test_describe_spreadsheet() {
        let text = describe(
            "quarterly_sales-2024.xlsx",
            FileCategory::Document,
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            200 * 1024,
        );
        assert_eq!(text, "quarterly sales 2024 document spreadsheet excel data");
    }

    #[test]
    fn test_describe_size_classes() {
        let small = describe("a.png", FileCategory::Image, Some("image/png"), 10);
        assert_eq!(small, "a image image picture photo small");

        let large = describe("movie.mp4", FileCategory::Video, Some("video/mp4"), 11 * 1024 * 1024);
        assert_eq!(large, "movie video video movie clip large");

        let medium = describe("x.bin", FileCategory::Other, None, SMALL_FILE_BYTES);
        assert_eq!(medium, "x other");
    }
}

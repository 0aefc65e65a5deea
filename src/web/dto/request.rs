//! Request DTOs for the HTTP API.

use serde::Deserialize;
use validator::Validate;

use super::validation::display_name_chars;
use crate::file::{FileCategory, DEFAULT_PAGE_SIZE};
use crate::ShelfError;

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Issue a long-lived token.
    #[serde(default)]
    pub remember_me: bool,
}

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
    #[validate(
        length(min = 1, max = 100, message = "Display name must be 1-100 characters"),
        custom(function = "display_name_chars")
    )]
    pub display_name: String,
}

/// Query parameters for `GET /api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Free-text filter.
    pub q: Option<String>,
    /// Comma-separated category names.
    pub categories: Option<String>,
    pub sort_field: Option<String>,
    pub sort_dir: Option<String>,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Query parameters for `GET /api/search/suggest`.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestQuery {
    pub q: Option<String>,
    /// Comma-separated category names.
    pub categories: Option<String>,
}

/// Parse a comma-separated category list. Blank entries are skipped.
pub fn parse_categories(value: Option<&str>) -> Result<Vec<FileCategory>, ShelfError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };

    let mut categories = Vec::new();
    for part in value.split(',').filter(|p| !p.trim().is_empty()) {
        let category: FileCategory = part.parse()?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories() {
        assert!(parse_categories(None).unwrap().is_empty());
        assert!(parse_categories(Some("")).unwrap().is_empty());
        assert_eq!(
            parse_categories(Some("IMAGE, video,,IMAGE")).unwrap(),
            vec![FileCategory::Image, FileCategory::Video]
        );
        assert!(matches!(
            parse_categories(Some("IMAGE,PICTURES")),
            Err(ShelfError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "pw12345678".to_string(),
            display_name: "A".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = RegisterRequest {
            email: "nope".to_string(),
            password: "short".to_string(),
            display_name: "   ".to_string(),
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("display_name"));
    }

    #[test]
    fn test_login_request_remember_me_defaults_false() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@x.com","password":"pw12345678"}"#).unwrap();
        assert!(!req.remember_me);
    }
}

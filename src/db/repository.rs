//! Identity repository (credential store) for Fileshelf.

use sqlx::SqlitePool;

use super::user::{Identity, NewIdentity};
use crate::{Result, ShelfError};

const SELECT_IDENTITY: &str =
    "SELECT id, email, display_name, password_hash, can_upload, created_at FROM users";

/// Repository for identity records.
pub struct IdentityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> IdentityRepository<'a> {
    /// Create a new IdentityRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new identity with `can_upload = false`.
    ///
    /// A duplicate email (case-insensitive) fails with `Conflict`.
    pub async fn create(&self, new_identity: &NewIdentity) -> Result<Identity> {
        let result = sqlx::query(
            "INSERT INTO users (email, email_key, display_name, password_hash, can_upload)
             VALUES (?, ?, ?, ?, 0)",
        )
        .bind(&new_identity.email)
        .bind(email_key(&new_identity.email))
        .bind(&new_identity.display_name)
        .bind(&new_identity.password_hash)
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                ShelfError::Conflict("email already registered".to_string())
            }
            other => ShelfError::from(other),
        })?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("identity".to_string()))
    }

    /// Get an identity by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(&format!("{SELECT_IDENTITY} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(identity)
    }

    /// Get an identity by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(&format!(
            "{SELECT_IDENTITY} WHERE email_key = ?"
        ))
        .bind(email_key(email))
        .fetch_optional(self.pool)
        .await?;
        Ok(identity)
    }

    /// Check if an email is already registered (case-insensitive).
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email_key = ?)")
                .bind(email_key(email))
                .fetch_one(self.pool)
                .await?;
        Ok(exists.0)
    }

    /// Grant or revoke the upload capability.
    ///
    /// Returns false if no identity has the given ID.
    pub async fn set_can_upload(&self, id: i64, can_upload: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET can_upload = ? WHERE id = ?")
            .bind(can_upload)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Lookup key for an email. SQLite's NOCASE only folds ASCII.
fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

//! Identity model for Fileshelf.

/// A registered identity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Identity {
    /// Unique identity ID.
    pub id: i64,
    /// Login email (unique, case-insensitive).
    pub email: String,
    /// Name shown next to uploaded files.
    pub display_name: String,
    /// Password hash (Argon2id PHC string).
    pub password_hash: String,
    /// Upload capability. Only changed by an administrator.
    pub can_upload: bool,
    /// Account creation timestamp.
    pub created_at: String,
}

/// Data for creating a new identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    /// Login email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Password hash (must be pre-hashed).
    pub password_hash: String,
}

impl NewIdentity {
    /// Create a new identity record. Identities start without upload capability.
    pub fn new(
        email: impl Into<String>,
        display_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
            password_hash: password_hash.into(),
        }
    }
}

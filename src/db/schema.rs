//! Database schema and migrations for Fileshelf.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: identities
    r#"
CREATE TABLE users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL COLLATE NOCASE,
    display_name  TEXT NOT NULL,
    password_hash TEXT NOT NULL,           -- Argon2id PHC string
    can_upload    INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX idx_users_email_nocase ON users(email COLLATE NOCASE);
"#,
    // v2: stored file records
    r#"
CREATE TABLE stored_files (
    id              TEXT PRIMARY KEY,      -- UUID v4
    title           TEXT NOT NULL,
    filename        TEXT NOT NULL,
    category        TEXT NOT NULL,         -- IMAGE, VIDEO, AUDIO, DOCUMENT, ARCHIVE, CODE, OTHER
    uploaded_at     TEXT NOT NULL,         -- RFC 3339, UTC, fixed width
    uploaded_by     INTEGER NOT NULL REFERENCES users(id),
    file_size_bytes INTEGER NOT NULL,
    metadata_text   TEXT NOT NULL,
    content_type    TEXT,
    storage_path    TEXT NOT NULL UNIQUE,
    content_hash    TEXT NOT NULL          -- SHA-256, lowercase hex
);

CREATE INDEX idx_stored_files_uploaded_at ON stored_files(uploaded_at);
CREATE INDEX idx_stored_files_category ON stored_files(category);
CREATE INDEX idx_stored_files_uploaded_by ON stored_files(uploaded_by);
"#,
    // v3: Unicode-folded lookup keys, lowercased by the application on write
    r#"
ALTER TABLE users ADD COLUMN email_key TEXT NOT NULL DEFAULT '';
UPDATE users SET email_key = lower(email);
CREATE UNIQUE INDEX idx_users_email_key ON users(email_key);

ALTER TABLE stored_files ADD COLUMN title_lc TEXT NOT NULL DEFAULT '';
ALTER TABLE stored_files ADD COLUMN filename_lc TEXT NOT NULL DEFAULT '';
ALTER TABLE stored_files ADD COLUMN metadata_lc TEXT NOT NULL DEFAULT '';
UPDATE stored_files
   SET title_lc = lower(title),
       filename_lc = lower(filename),
       metadata_lc = lower(metadata_text);
"#,
];

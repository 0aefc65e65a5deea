//! Configuration module for Fileshelf.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ShelfError};

/// Minimum signing secret length in bytes (256-bit HMAC key).
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/fileshelf.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored blobs. Created at startup if missing.
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_root() -> String {
    "data/files".to_string()
}

fn default_max_upload_size() -> u64 {
    100
}

impl StorageConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Token issuing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Issuer written into and required from every token.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    /// Lifetime in seconds of tokens issued with "remember me".
    #[serde(default = "default_remember_me_ttl")]
    pub remember_me_ttl_secs: i64,
}

fn default_issuer() -> String {
    "fileshelf".to_string()
}

fn default_access_ttl() -> i64 {
    900 // 15 minutes
}

fn default_remember_me_ttl() -> i64 {
    30 * 24 * 3600 // 30 days
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: default_issuer(),
            access_token_ttl_secs: default_access_ttl(),
            remember_me_ttl_secs: default_remember_me_ttl(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WebConfig {
    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/fileshelf.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Token configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ShelfError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ShelfError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILESHELF_JWT_SECRET`: Override the token signing secret
    /// - `FILESHELF_STORAGE_ROOT`: Override the blob storage root
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("FILESHELF_JWT_SECRET") {
            if !secret.is_empty() {
                self.auth.jwt_secret = secret;
            }
        }
        if let Ok(root) = std::env::var("FILESHELF_STORAGE_ROOT") {
            if !root.is_empty() {
                self.storage.root = root;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the signing secret is shorter than 32 bytes
    /// - either token lifetime is not positive
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ShelfError::Config(format!(
                "jwt_secret must be at least {MIN_JWT_SECRET_LENGTH} bytes. \
                 Set it in config.toml or via FILESHELF_JWT_SECRET environment variable."
            )));
        }
        if self.auth.access_token_ttl_secs <= 0 || self.auth.remember_me_ttl_secs <= 0 {
            return Err(ShelfError::Config(
                "token lifetimes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);

        assert_eq!(config.database.path, "data/fileshelf.db");

        assert_eq!(config.storage.root, "data/files");
        assert_eq!(config.storage.max_upload_size_mb, 100);
        assert_eq!(config.storage.max_upload_bytes(), 100 * 1024 * 1024);

        assert!(config.auth.jwt_secret.is_empty());
        assert_eq!(config.auth.issuer, "fileshelf");
        assert_eq!(config.auth.access_token_ttl_secs, 900);
        assert_eq!(config.auth.remember_me_ttl_secs, 30 * 24 * 3600);

        assert!(config.web.cors_origins.is_empty());

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/fileshelf.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3000

[database]
path = "custom/db.sqlite"

[storage]
root = "/srv/blobs"
max_upload_size_mb = 20

[auth]
jwt_secret = "0123456789abcdef0123456789abcdef"
issuer = "shelf-test"
access_token_ttl_secs = 600
remember_me_ttl_secs = 86400

[web]
cors_origins = ["http://localhost:5173"]

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "custom/db.sqlite");
        assert_eq!(config.storage.root, "/srv/blobs");
        assert_eq!(config.storage.max_upload_size_mb, 20);
        assert_eq!(config.auth.jwt_secret, SECRET);
        assert_eq!(config.auth.issuer, "shelf-test");
        assert_eq!(config.auth.access_token_ttl_secs, 600);
        assert_eq!(config.auth.remember_me_ttl_secs, 86400);
        assert_eq!(config.web.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 9000

[auth]
issuer = "partial"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.issuer, "partial");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.access_token_ttl_secs, 900);
        assert_eq!(config.storage.root, "data/files");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "data/fileshelf.db");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(ShelfError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(ShelfError::Io(_))));
    }

    // Both env vars are exercised in one test so parallel tests never race on them.
    #[test]
    fn test_apply_env_overrides() {
        let original_secret = std::env::var("FILESHELF_JWT_SECRET").ok();
        let original_root = std::env::var("FILESHELF_STORAGE_ROOT").ok();

        std::env::set_var("FILESHELF_JWT_SECRET", "env-secret-key");
        std::env::set_var("FILESHELF_STORAGE_ROOT", "");

        let mut config = Config::default();
        config.storage.root = "configured/root".to_string();
        config.apply_env_overrides();

        assert_eq!(config.auth.jwt_secret, "env-secret-key");
        // Empty values never override
        assert_eq!(config.storage.root, "configured/root");

        std::env::set_var("FILESHELF_STORAGE_ROOT", "/env/root");
        config.apply_env_overrides();
        assert_eq!(config.storage.root, "/env/root");

        match original_secret {
            Some(val) => std::env::set_var("FILESHELF_JWT_SECRET", val),
            None => std::env::remove_var("FILESHELF_JWT_SECRET"),
        }
        match original_root {
            Some(val) => std::env::set_var("FILESHELF_STORAGE_ROOT", val),
            None => std::env::remove_var("FILESHELF_STORAGE_ROOT"),
        }
    }

    #[test]
    fn test_validate_missing_secret() {
        let config = Config::default();
        let result = config.validate();
        assert!(matches!(result, Err(ShelfError::Config(msg)) if msg.contains("jwt_secret")));
    }

    #[test]
    fn test_validate_short_secret() {
        let mut config = Config::default();
        config.auth.jwt_secret = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_non_positive_ttl() {
        let mut config = Config::default();
        config.auth.jwt_secret = SECRET.to_string();
        config.auth.access_token_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        let mut config = Config::default();
        config.auth.jwt_secret = SECRET.to_string();
        assert!(config.validate().is_ok());
    }
}

//! Test helpers for HTTP API tests.
//!
//! Builds the router in-process over an in-memory database and a temporary
//! blob store root.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum_test::TestServer;
use chrono::Duration;
use serde_json::{json, Value};
use tempfile::TempDir;

use fileshelf::auth::{AuthService, TokenCodec};
use fileshelf::file::{BlobStore, DEFAULT_MAX_UPLOAD_BYTES};
use fileshelf::web::handlers::AppState;
use fileshelf::web::router::create_router;
use fileshelf::{Database, IdentityRepository};

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only!";
pub const ISSUER: &str = "fileshelf";
pub const PASSWORD: &str = "password123";

/// A running in-process API with its backing stores.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub storage: BlobStore,
    _storage_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_max_upload_bytes(DEFAULT_MAX_UPLOAD_BYTES).await
    }

    pub async fn with_max_upload_bytes(max_upload_bytes: u64) -> Self {
        let storage_dir = TempDir::new().expect("Failed to create temp dir");
        let storage =
            BlobStore::new(storage_dir.path().join("blobs")).expect("Failed to open blob store");

        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");

        let auth = AuthService::new(
            db.pool().clone(),
            Arc::new(TokenCodec::new(JWT_SECRET, ISSUER)),
            Duration::seconds(900),
            Duration::days(30),
        );

        let app_state = Arc::new(AppState::new(
            db.clone(),
            auth,
            storage.clone(),
            max_upload_bytes,
        ));

        let router = create_router(app_state, &[]);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            db,
            storage,
            _storage_dir: storage_dir,
        }
    }

    pub fn storage_root(&self) -> &Path {
        self.storage.root()
    }

    /// Register an identity and return the response body.
    pub async fn register(&self, email: &str, display_name: &str) -> Value {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({
                "email": email,
                "password": PASSWORD,
                "display_name": display_name
            }))
            .await;
        response.json::<Value>()
    }

    /// Log in and return the access token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({
                "email": email,
                "password": PASSWORD
            }))
            .await;
        response.assert_status_ok();
        token_of(&response.json::<Value>())
    }

    /// Register an identity, grant it the upload capability and return
    /// `(identity id, token)`.
    pub async fn uploader(&self, email: &str, display_name: &str) -> (i64, String) {
        let body = self.register(email, display_name).await;
        let id = body["data"]["user"]["id"].as_i64().expect("No user id");
        self.grant_upload(id).await;
        (id, token_of(&body))
    }

    pub async fn grant_upload(&self, id: i64) {
        IdentityRepository::new(self.db.pool())
            .set_can_upload(id, true)
            .await
            .expect("Failed to grant upload");
    }

    pub async fn revoke_upload(&self, id: i64) {
        IdentityRepository::new(self.db.pool())
            .set_can_upload(id, false)
            .await
            .expect("Failed to revoke upload");
    }
}

pub fn token_of(body: &Value) -> String {
    body["data"]["access_token"]
        .as_str()
        .expect("No access token")
        .to_string()
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("Invalid header value")
}
